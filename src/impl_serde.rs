//! Serde serialization support for the parsed tree.
//!
//! Enabled by the `serde` feature flag. Serialization only: tables become
//! maps, arrays become sequences, and date/time values serialize as their
//! re-emitted lexemes.

use crate::{Array, Table, Value};
use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq};

impl Serialize for Value<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(v) => ser.serialize_f64(*v),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::LocalDatetime(dt) => ser.collect_str(dt),
            Value::OffsetDatetime(dt) => ser.collect_str(dt),
            Value::Array(arr) => arr.serialize(ser),
            Value::Table(tab) => tab.serialize(ser),
        }
    }
}

impl Serialize for Array<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl Serialize for Table<'_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
