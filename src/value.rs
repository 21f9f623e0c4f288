//! The [`Value`] sum type produced by parsing.

use crate::array::Array;
use crate::table::Table;
use crate::time::{LocalDatetime, OffsetDatetime};
use std::borrow::Cow;

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

/// A parsed TOML value.
///
/// Strings borrow from the input where possible; escape sequences force an
/// owned copy. The eight variants are closed — matches are exhaustive.
#[derive(Clone, PartialEq)]
pub enum Value<'de> {
    /// A string, borrowed from the document unless escapes were decoded.
    String(Cow<'de, str>),
    /// A signed 64-bit integer.
    Integer(i64),
    /// An IEEE-754 double; may be infinite or NaN.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A date, time, or date-time without a UTC offset.
    LocalDatetime(LocalDatetime),
    /// A date-time anchored to UTC with its source offset preserved.
    OffsetDatetime(OffsetDatetime),
    /// An ordered sequence of values.
    Array(Array<'de>),
    /// A key-value mapping.
    Table(Table<'de>),
}

/// Discriminator for [`Value`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    LocalDatetime,
    OffsetDatetime,
    Array,
    Table,
}

impl<'de> Value<'de> {
    /// Returns the variant discriminator.
    pub fn kind(&self) -> Kind {
        match self {
            Self::String(..) => Kind::String,
            Self::Integer(..) => Kind::Integer,
            Self::Float(..) => Kind::Float,
            Self::Boolean(..) => Kind::Boolean,
            Self::LocalDatetime(..) => Kind::LocalDatetime,
            Self::OffsetDatetime(..) => Kind::OffsetDatetime,
            Self::Array(..) => Kind::Array,
            Self::Table(..) => Kind::Table,
        }
    }

    /// The variant name as a string, for diagnostics.
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::String(..) => "string",
            Self::Integer(..) => "integer",
            Self::Float(..) => "float",
            Self::Boolean(..) => "boolean",
            Self::LocalDatetime(..) => "local datetime",
            Self::OffsetDatetime(..) => "offset datetime",
            Self::Array(..) => "array",
            Self::Table(..) => "table",
        }
    }

    /// Returns the string contents if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the local date/time if this is an offset-less datetime.
    pub fn as_local_datetime(&self) -> Option<&LocalDatetime> {
        match self {
            Self::LocalDatetime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the offset date-time if this is an anchored datetime.
    pub fn as_offset_datetime(&self) -> Option<&OffsetDatetime> {
        match self {
            Self::OffsetDatetime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns a borrowed array if this is an array value.
    pub fn as_array(&self) -> Option<&Array<'de>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a borrowed table if this is a table value.
    pub fn as_table(&self) -> Option<&Table<'de>> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Debug prints the payload alone; date/time values render as their
/// re-emitted lexemes.
impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => std::fmt::Debug::fmt(s, f),
            Self::Integer(i) => std::fmt::Debug::fmt(i, f),
            Self::Float(v) => std::fmt::Debug::fmt(v, f),
            Self::Boolean(b) => std::fmt::Debug::fmt(b, f),
            Self::LocalDatetime(dt) => std::fmt::Display::fmt(dt, f),
            Self::OffsetDatetime(dt) => std::fmt::Display::fmt(dt, f),
            Self::Array(a) => std::fmt::Debug::fmt(a, f),
            Self::Table(t) => std::fmt::Debug::fmt(t, f),
        }
    }
}
