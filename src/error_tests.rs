use super::*;
use crate::time::DatetimeError;

fn message(kind: ErrorKind) -> String {
    Error { kind }.to_string()
}

#[test]
fn messages_are_single_line() {
    let kinds = [
        ErrorKind::ForbiddenControlChar,
        ErrorKind::UnexpectedEof,
        ErrorKind::Expected {
            wanted: ']',
            found: Some('\n'),
        },
        ErrorKind::Expected {
            wanted: '=',
            found: None,
        },
        ErrorKind::ExpectedKey,
        ErrorKind::UnexpectedChar('?'),
        ErrorKind::InvalidInteger,
        ErrorKind::LeadingZero,
        ErrorKind::InvalidFloat,
        ErrorKind::InvalidEscape('z'),
        ErrorKind::TruncatedUnicodeEscape,
        ErrorKind::InvalidUnicodeEscape(0xD800),
        ErrorKind::UnterminatedString,
        ErrorKind::MultilineStringKey,
        ErrorKind::MalformedDatetime(DatetimeError::MonthRange),
        ErrorKind::DuplicateKey { key: "a".into() },
        ErrorKind::DuplicateTable { name: "t".into() },
        ErrorKind::NotATable { key: "a".into() },
        ErrorKind::ExtendInlineTable { key: "a".into() },
        ErrorKind::ExtendStaticArray { key: "a".into() },
        ErrorKind::NotArrayOfTables { key: "a".into() },
        ErrorKind::RecursionLimit,
    ];
    for kind in kinds {
        let text = message(kind);
        assert!(!text.is_empty());
        assert!(!text.contains('\n'), "multi-line message: {text:?}");
    }
}

#[test]
fn expected_messages_escape_whitespace() {
    let text = message(ErrorKind::Expected {
        wanted: ']',
        found: Some('\n'),
    });
    assert_eq!(text, "expected ']' but found '\\n'");

    let text = message(ErrorKind::Expected {
        wanted: '=',
        found: None,
    });
    assert_eq!(text, "expected '=' but found end of input");
}

#[test]
fn structural_messages_name_the_key() {
    assert_eq!(
        message(ErrorKind::NotATable { key: "srv".into() }),
        "key 'srv' already defined as non-table"
    );
    assert_eq!(
        message(ErrorKind::DuplicateKey { key: "x".into() }),
        "key 'x' already defined"
    );
    assert_eq!(
        message(ErrorKind::NotArrayOfTables { key: "a".into() }),
        "key 'a' already defined as non-array-of-tables"
    );
    assert_eq!(
        message(ErrorKind::ExtendStaticArray { key: "a".into() }),
        "cannot extend static array 'a' with table header"
    );
}

#[test]
fn unicode_escape_message_is_hex() {
    assert_eq!(
        message(ErrorKind::InvalidUnicodeEscape(0xD800)),
        "invalid unicode codepoint in escape: 0xd800"
    );
}

#[test]
fn datetime_messages_pass_through() {
    assert_eq!(
        message(ErrorKind::MalformedDatetime(DatetimeError::SecondRange)),
        "invalid time: second must be 00-60"
    );
}

#[test]
fn kind_codes() {
    assert_eq!(ErrorKind::UnterminatedString.to_string(), "unterminated-string");
    assert_eq!(
        ErrorKind::DuplicateKey { key: "k".into() }.to_string(),
        "duplicate-key"
    );
    // Debug matches the code, not a derived struct dump
    assert_eq!(format!("{:?}", ErrorKind::InvalidInteger), "invalid-integer");
}

#[test]
fn error_is_a_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(Error {
        kind: ErrorKind::UnexpectedEof,
    });
    assert_eq!(err.to_string(), "unexpected end of input");
}
