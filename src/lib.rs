//! A TOML 1.0 parser built for throughput: SIMD-accelerated scanning over
//! the input buffer and a value tree that borrows from it.
//!
//! Whitespace runs, comment bodies, and string contents are skipped with
//! AVX2 (when the CPU has it) or SWAR word scans, falling back to scalar
//! code near the end of the buffer — the fast paths are byte-identical to
//! the scalar ones. Strings and keys without escape sequences are zero-copy
//! slices of the input.
//!
//! # Quick start
//!
//! ```
//! # fn main() -> Result<(), simdtoml::Error> {
//! let table = simdtoml::parse("key = 'value'")?;
//! assert_eq!(table.get("key").and_then(|v| v.as_str()), Some("value"));
//! # Ok(())
//! # }
//! ```
//!
//! Every entry is a [`Value`], a closed sum over the eight TOML shapes:
//!
//! ```
//! use simdtoml::Value;
//!
//! let table = simdtoml::parse("dob = 1979-05-27T07:32:00-08:00").unwrap();
//! match &table.get("dob").unwrap() {
//!     Value::OffsetDatetime(dt) => {
//!         assert_eq!(dt.offset_minutes(), -480);
//!         assert_eq!(dt.to_string(), "1979-05-27T07:32:00-08:00");
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Parsing stops at the first problem; the returned [`Error`] renders a
//! single-line message:
//!
//! ```
//! let err = simdtoml::parse("port = 0x_1").unwrap_err();
//! assert_eq!(err.to_string(), "invalid integer");
//! ```

mod array;
mod error;
mod parser;
mod scan;
mod table;
mod time;
mod value;

pub use array::Array;
pub use error::{Error, ErrorKind};
pub use parser::parse;
pub use table::Table;
pub use time::{Date, DatetimeError, LocalDatetime, OffsetDatetime, Time};
pub use value::{Kind, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;
