use crate::value::Value;
use std::borrow::Cow;

#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

/// Tables at or above this many entries get a hash index; below it a
/// linear scan is faster than hashing.
const INDEX_THRESHOLD: usize = 6;

type Entry<'de> = (Cow<'de, str>, Value<'de>);

/// A TOML table: key-value pairs in insertion order with unique keys.
///
/// Lookup is a linear scan for small tables and switches to a
/// `foldhash`-based index once the table grows past a threshold.
#[derive(Clone)]
pub struct Table<'de> {
    entries: Vec<Entry<'de>>,
    index: Option<Box<foldhash::HashMap<Box<str>, usize>>>,
    origin: TableOrigin,
}

/// How a table came to exist; drives the redefinition rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum TableOrigin {
    /// The document root.
    Root,
    /// Opened by an explicit `[header]` (or created as a `[[header]]` entry).
    Explicit,
    /// Created in passing while resolving a header path.
    Implicit,
    /// Created by a dotted-key intermediate segment.
    Dotted,
    /// An inline `{ ... }` table; closed to all later extension.
    Inline,
}

impl<'de> Table<'de> {
    pub(crate) fn with_origin(origin: TableOrigin) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            origin,
        }
    }

    pub(crate) fn origin(&self) -> TableOrigin {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: TableOrigin) {
        self.origin = origin;
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value<'de>> {
        self.find_index(name).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value<'de>> {
        self.find_index(name).map(|i| &mut self.entries[i].1)
    }

    /// Returns `true` if the table contains the key.
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns all entries in insertion order.
    pub fn entries(&self) -> &[Entry<'de>] {
        &self.entries
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'de>)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub(crate) fn find_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = &self.index {
            return index.get(name).copied();
        }
        self.entries.iter().position(|(k, _)| k.as_ref() == name)
    }

    /// Appends an entry. The caller is responsible for uniqueness checks.
    /// Returns the index of the new entry.
    pub(crate) fn push(&mut self, key: Cow<'de, str>, value: Value<'de>) -> usize {
        let at = self.entries.len();
        if let Some(index) = &mut self.index {
            index.insert(key.as_ref().into(), at);
        } else if at + 1 == INDEX_THRESHOLD {
            let mut index = foldhash::HashMap::with_capacity_and_hasher(
                INDEX_THRESHOLD * 2,
                foldhash::fast::RandomState::default(),
            );
            for (i, (k, _)) in self.entries.iter().enumerate() {
                index.insert(k.as_ref().into(), i);
            }
            index.insert(key.as_ref().into(), at);
            self.index = Some(Box::new(index));
        }
        self.entries.push((key, value));
        at
    }

    pub(crate) fn value_at_mut(&mut self, at: usize) -> &mut Value<'de> {
        &mut self.entries[at].1
    }
}

impl<'a, 'de> IntoIterator for &'a Table<'de> {
    type Item = (&'a str, &'a Value<'de>);
    type IntoIter = Iter<'a, 'de>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Borrowing iterator over a [`Table`], yielding `(&str, &Value)` pairs.
pub struct Iter<'a, 'de> {
    inner: std::slice::Iter<'a, Entry<'de>>,
}

impl<'a, 'de> Iterator for Iter<'a, 'de> {
    type Item = (&'a str, &'a Value<'de>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_ref(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}

impl PartialEq for Table<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl std::fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.entries {
            map.entry(&k.as_ref(), v);
        }
        map.finish()
    }
}
