use crate::time::DatetimeError;
use std::fmt::{self, Debug, Display};

/// Error produced when a TOML document fails to parse.
///
/// Only the first problem encountered is reported; parsing stops there.
/// The [`Display`] impl renders a single-line human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

/// The varieties of parse failure.
#[derive(Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A control character in U+0000..=U+001F (other than tab, LF, or CR in
    /// a CRLF pair) or U+007F appeared somewhere in the input.
    ForbiddenControlChar,

    /// The input ended where a value or key was required.
    UnexpectedEof,

    /// A specific punctuation byte was required but something else was found.
    /// `found` is `None` at end of input.
    Expected { wanted: char, found: Option<char> },

    /// A key was required but the next byte cannot start one.
    ExpectedKey,

    /// A value began with a byte that no TOML value can start with.
    UnexpectedChar(char),

    /// An integer literal had bad digits, misplaced underscores, or
    /// overflowed the signed 64-bit range.
    InvalidInteger,

    /// A decimal number had a leading zero (`07`, `00.5`).
    LeadingZero,

    /// A float literal was malformed (leading/trailing/double dot, bad
    /// exponent, misplaced underscore, or out of range).
    InvalidFloat,

    /// An unrecognized escape sequence in a basic string.
    InvalidEscape(char),

    /// A `\u`/`\U` escape ended early or contained a non-hex digit.
    TruncatedUnicodeEscape,

    /// A `\u`/`\U` escape named a surrogate or a value above U+10FFFF.
    InvalidUnicodeEscape(u32),

    /// A string ran to end of input without its closing delimiter.
    UnterminatedString,

    /// A multiline string was used as a key.
    MultilineStringKey,

    /// A date or time value committed to its shape and then broke a rule.
    MalformedDatetime(DatetimeError),

    /// A key was assigned twice in the same table.
    DuplicateKey { key: Box<str> },

    /// The same `[table]` header appeared twice.
    DuplicateTable { name: Box<str> },

    /// A dotted key or header tried to traverse through a non-table value.
    NotATable { key: Box<str> },

    /// A dotted key or header tried to reach into an inline table.
    ExtendInlineTable { key: Box<str> },

    /// A `[header]` tried to descend through an array that was assigned
    /// with `key = [...]` rather than built from `[[key]]` headers.
    ExtendStaticArray { key: Box<str> },

    /// `[[key]]` named something that is not an array of tables.
    NotArrayOfTables { key: Box<str> },

    /// Arrays and inline tables nested beyond the supported depth.
    RecursionLimit,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::ForbiddenControlChar => "forbidden-control-char",
            Self::UnexpectedEof => "unexpected-eof",
            Self::Expected { .. } => "expected",
            Self::ExpectedKey => "expected-key",
            Self::UnexpectedChar(..) => "unexpected-char",
            Self::InvalidInteger => "invalid-integer",
            Self::LeadingZero => "leading-zero",
            Self::InvalidFloat => "invalid-float",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::TruncatedUnicodeEscape => "truncated-unicode-escape",
            Self::InvalidUnicodeEscape(..) => "invalid-unicode-escape",
            Self::UnterminatedString => "unterminated-string",
            Self::MultilineStringKey => "multiline-string-key",
            Self::MalformedDatetime(..) => "malformed-datetime",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::NotATable { .. } => "not-a-table",
            Self::ExtendInlineTable { .. } => "extend-inline-table",
            Self::ExtendStaticArray { .. } => "extend-static-array",
            Self::NotArrayOfTables { .. } => "not-array-of-tables",
            Self::RecursionLimit => "recursion-limit",
        };
        f.write_str(code)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Renders a character for an error message, escaping whitespace and
/// control characters so the message stays on one line.
struct Escape(char);

impl Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;
        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ForbiddenControlChar => f.write_str(
                "control characters (U+0000-U+001F except tab/LF/CR in CRLF) \
                 and U+007F are not permitted",
            ),
            ErrorKind::UnexpectedEof => f.write_str("unexpected end of input"),
            ErrorKind::Expected { wanted, found } => {
                write!(f, "expected '{}' but found ", Escape(*wanted))?;
                match found {
                    Some(c) => write!(f, "'{}'", Escape(*c)),
                    None => f.write_str("end of input"),
                }
            }
            ErrorKind::ExpectedKey => f.write_str("expected a key"),
            ErrorKind::UnexpectedChar(c) => {
                write!(f, "unexpected character in value: '{}'", Escape(*c))
            }
            ErrorKind::InvalidInteger => f.write_str("invalid integer"),
            ErrorKind::LeadingZero => {
                f.write_str("leading zero not allowed in decimal number")
            }
            ErrorKind::InvalidFloat => f.write_str("invalid float"),
            ErrorKind::InvalidEscape(c) => write!(
                f,
                "invalid escape sequence in string: \\{} \
                 (allowed: \\b \\t \\n \\f \\r \\\" \\\\ \\uXXXX \\UXXXXXXXX)",
                Escape(*c)
            ),
            ErrorKind::TruncatedUnicodeEscape => {
                f.write_str("truncated unicode escape in string")
            }
            ErrorKind::InvalidUnicodeEscape(cp) => {
                write!(f, "invalid unicode codepoint in escape: {cp:#x}")
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::MultilineStringKey => {
                f.write_str("multiline strings are not allowed as keys")
            }
            ErrorKind::MalformedDatetime(e) => Display::fmt(e, f),
            ErrorKind::DuplicateKey { key } => {
                write!(f, "key '{key}' already defined")
            }
            ErrorKind::DuplicateTable { name } => {
                write!(f, "table '{name}' already defined")
            }
            ErrorKind::NotATable { key } => {
                write!(f, "key '{key}' already defined as non-table")
            }
            ErrorKind::ExtendInlineTable { key } => {
                write!(f, "inline table '{key}' cannot be extended")
            }
            ErrorKind::ExtendStaticArray { key } => {
                write!(f, "cannot extend static array '{key}' with table header")
            }
            ErrorKind::NotArrayOfTables { key } => {
                write!(f, "key '{key}' already defined as non-array-of-tables")
            }
            ErrorKind::RecursionLimit => {
                f.write_str("arrays and inline tables nested too deeply")
            }
        }
    }
}

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
