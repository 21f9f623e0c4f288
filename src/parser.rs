//! The recursive-descent parser: cursor primitives, literal parsers, and
//! the structural engine that applies TOML's redefinition rules.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::array::Array;
use crate::error::{Error, ErrorKind};
use crate::scan;
use crate::table::{Table, TableOrigin};
use crate::time::Datetime;
use crate::value::Value;
use std::borrow::Cow;

/// Arrays and inline tables nested deeper than this are rejected rather
/// than risking the call stack.
const MAX_RECURSION_DEPTH: i16 = 256;

/// Marker for "an error has been recorded". The kind is parked in
/// `Parser::error`; helpers return this so recursive descent can unwind.
#[derive(Copy, Clone)]
struct ParseError;

struct Parser<'de> {
    text: &'de str,
    cursor: usize,
    /// Sticky error channel: the first kind recorded is the one surfaced.
    error: Option<ErrorKind>,
}

impl<'de> Parser<'de> {
    fn new(text: &'de str) -> Self {
        // Skip a UTF-8 BOM (EF BB BF) at the start.
        let cursor = if text.as_bytes().starts_with(b"\xef\xbb\xbf") {
            3
        } else {
            0
        };
        Parser {
            text,
            cursor,
            error: None,
        }
    }

    #[inline]
    fn bytes(&self) -> &'de [u8] {
        self.text.as_bytes()
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes().get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.cursor + offset).copied()
    }

    #[inline]
    fn eof(&self) -> bool {
        self.cursor >= self.text.len()
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    #[cold]
    fn fail(&mut self, kind: ErrorKind) -> ParseError {
        if self.error.is_none() {
            self.error = Some(kind);
        }
        ParseError
    }

    fn take_error(&mut self) -> Error {
        let kind = self
            .error
            .take()
            .expect("take_error called without a recorded error");
        Error { kind }
    }

    /// The character at the cursor, for error messages. The cursor always
    /// sits on a char boundary.
    fn peek_char(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), ParseError> {
        if self.eat_byte(b) {
            Ok(())
        } else {
            let found = self.peek_char();
            Err(self.fail(ErrorKind::Expected {
                wanted: b as char,
                found,
            }))
        }
    }

    fn skip_ws(&mut self) {
        self.cursor = scan::skip_ws(self.bytes(), self.cursor);
    }

    fn skip_ws_no_nl(&mut self) {
        self.cursor = scan::skip_ws_no_nl(self.bytes(), self.cursor);
    }

    /// Skips a `#` comment through the end of its line. Comment bodies need
    /// no byte checks here: pre-validation already rejected every control
    /// character a comment could not contain.
    fn skip_comment(&mut self) -> bool {
        if self.peek_byte() == Some(b'#') {
            self.cursor = scan::find_byte(self.bytes(), self.cursor, b'\n');
            true
        } else {
            false
        }
    }

    /// Skips whitespace (newlines included) and comments.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_ws();
            if !self.skip_comment() {
                return;
            }
        }
    }

    // ── keys ────────────────────────────────────────────────────────

    fn read_bare_key(&mut self) -> &'de str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_bare_key_byte(b) {
                break;
            }
            self.cursor += 1;
        }
        &self.text[start..self.cursor]
    }

    fn parse_key(&mut self) -> Result<Cow<'de, str>, ParseError> {
        match self.peek_byte() {
            Some(q @ (b'"' | b'\'')) => {
                if self.peek_byte_at(1) == Some(q) && self.peek_byte_at(2) == Some(q) {
                    return Err(self.fail(ErrorKind::MultilineStringKey));
                }
                self.cursor += 1;
                if q == b'"' {
                    self.parse_basic_string()
                } else {
                    self.parse_literal_string()
                }
            }
            Some(b) if is_bare_key_byte(b) => Ok(Cow::Borrowed(self.read_bare_key())),
            _ => Err(self.fail(ErrorKind::ExpectedKey)),
        }
    }

    // ── strings ─────────────────────────────────────────────────────

    /// Cursor is on the opening quote of a string value.
    fn parse_string_value(&mut self, q: u8) -> Result<Cow<'de, str>, ParseError> {
        self.cursor += 1;
        if self.peek_byte() == Some(q) && self.peek_byte_at(1) == Some(q) {
            self.cursor += 2;
            if q == b'"' {
                self.parse_multiline_basic()
            } else {
                self.parse_multiline_literal()
            }
        } else if q == b'"' {
            self.parse_basic_string()
        } else {
            self.parse_literal_string()
        }
    }

    /// Single-line basic string; cursor is past the opening `"`. Decodes
    /// escapes into a scratch buffer only when one appears — otherwise the
    /// result borrows from the input.
    fn parse_basic_string(&mut self) -> Result<Cow<'de, str>, ParseError> {
        let content_start = self.cursor;
        let mut scratch: Option<String> = None;
        let mut flush_from = content_start;
        loop {
            self.cursor = scan::find_two(self.bytes(), self.cursor, b'"', b'\\');
            match self.peek_byte() {
                None => return Err(self.fail(ErrorKind::UnterminatedString)),
                Some(b'\\') => {
                    let s = scratch.get_or_insert_with(String::new);
                    s.push_str(&self.text[flush_from..self.cursor]);
                    self.cursor += 1;
                    self.decode_escape(s, false)?;
                    flush_from = self.cursor;
                }
                Some(_) => {
                    let end = self.cursor;
                    self.cursor += 1;
                    return Ok(match scratch {
                        Some(mut s) => {
                            s.push_str(&self.text[flush_from..end]);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(&self.text[content_start..end]),
                    });
                }
            }
        }
    }

    /// Single-line literal string; cursor is past the opening `'`. Always
    /// borrows: there are no escapes to decode.
    fn parse_literal_string(&mut self) -> Result<Cow<'de, str>, ParseError> {
        let start = self.cursor;
        let end = scan::find_byte(self.bytes(), start, b'\'');
        if end == self.text.len() {
            self.cursor = end;
            return Err(self.fail(ErrorKind::UnterminatedString));
        }
        self.cursor = end + 1;
        Ok(Cow::Borrowed(&self.text[start..end]))
    }

    /// A newline immediately after an opening `"""` or `'''` is trimmed.
    fn trim_leading_newline(&mut self) {
        if self.eat_byte(b'\n') {
            return;
        }
        if self.peek_byte() == Some(b'\r') && self.peek_byte_at(1) == Some(b'\n') {
            self.cursor += 2;
        }
    }

    /// Multiline basic string; cursor is past the opening `"""`.
    fn parse_multiline_basic(&mut self) -> Result<Cow<'de, str>, ParseError> {
        self.trim_leading_newline();
        let content_start = self.cursor;
        let mut scratch: Option<String> = None;
        let mut flush_from = content_start;
        loop {
            self.cursor = scan::find_two(self.bytes(), self.cursor, b'"', b'\\');
            match self.peek_byte() {
                None => return Err(self.fail(ErrorKind::UnterminatedString)),
                Some(b'\\') => {
                    let s = scratch.get_or_insert_with(String::new);
                    s.push_str(&self.text[flush_from..self.cursor]);
                    self.cursor += 1;
                    self.decode_escape(s, true)?;
                    flush_from = self.cursor;
                }
                Some(_) => {
                    // A run of 3 quotes closes the string; one or two more
                    // directly before the closer belong to the content.
                    let run_start = self.cursor;
                    let mut run = 0;
                    while run < 5 && self.eat_byte(b'"') {
                        run += 1;
                    }
                    if run < 3 {
                        continue;
                    }
                    let end = run_start + (run - 3);
                    return Ok(match scratch {
                        Some(mut s) => {
                            s.push_str(&self.text[flush_from..end]);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(&self.text[content_start..end]),
                    });
                }
            }
        }
    }

    /// Multiline literal string; cursor is past the opening `'''`.
    fn parse_multiline_literal(&mut self) -> Result<Cow<'de, str>, ParseError> {
        self.trim_leading_newline();
        let content_start = self.cursor;
        loop {
            self.cursor = scan::find_byte(self.bytes(), self.cursor, b'\'');
            if self.eof() {
                return Err(self.fail(ErrorKind::UnterminatedString));
            }
            let run_start = self.cursor;
            let mut run = 0;
            while run < 5 && self.eat_byte(b'\'') {
                run += 1;
            }
            if run < 3 {
                continue;
            }
            let end = run_start + (run - 3);
            return Ok(Cow::Borrowed(&self.text[content_start..end]));
        }
    }

    /// Cursor is past a backslash inside a basic string.
    fn decode_escape(&mut self, out: &mut String, multiline: bool) -> Result<(), ParseError> {
        let Some(b) = self.peek_byte() else {
            return Err(self.fail(ErrorKind::UnterminatedString));
        };
        self.cursor += 1;
        match b {
            b'b' => out.push('\u{8}'),
            b't' => out.push('\t'),
            b'n' => out.push('\n'),
            b'f' => out.push('\u{c}'),
            b'r' => out.push('\r'),
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'u' => {
                let c = self.decode_unicode_escape(4)?;
                out.push(c);
            }
            b'U' => {
                let c = self.decode_unicode_escape(8)?;
                out.push(c);
            }
            b' ' | b'\t' | b'\r' | b'\n' if multiline => {
                self.cursor -= 1;
                return self.eat_line_continuation();
            }
            _ => {
                self.cursor -= 1;
                let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(self.fail(ErrorKind::InvalidEscape(c)));
            }
        }
        Ok(())
    }

    /// Line-ending backslash: spaces and tabs up to a line break, then all
    /// following whitespace, disappear from the string.
    fn eat_line_continuation(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t') => self.cursor += 1,
                Some(b'\n') => {
                    self.cursor += 1;
                    break;
                }
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.cursor += 2;
                    break;
                }
                _ => {
                    let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Err(self.fail(ErrorKind::InvalidEscape(c)));
                }
            }
        }
        self.skip_ws();
        Ok(())
    }

    fn decode_unicode_escape(&mut self, digits: usize) -> Result<char, ParseError> {
        let mut cp: u32 = 0;
        for _ in 0..digits {
            let digit = self.peek_byte().and_then(|b| (b as char).to_digit(16));
            let Some(d) = digit else {
                return Err(self.fail(ErrorKind::TruncatedUnicodeEscape));
            };
            cp = (cp << 4) | d;
            self.cursor += 1;
        }
        // from_u32 rejects surrogates and anything past U+10FFFF.
        match char::from_u32(cp) {
            Some(c) => Ok(c),
            None => Err(self.fail(ErrorKind::InvalidUnicodeEscape(cp))),
        }
    }

    // ── scalar values ───────────────────────────────────────────────

    /// Reads bytes up to the next value terminator. The terminators are all
    /// ASCII, so the slice always ends on a char boundary.
    fn read_value_token(&mut self) -> &'de str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if is_value_terminator(b) {
                break;
            }
            self.cursor += 1;
        }
        &self.text[start..self.cursor]
    }

    fn parse_value(&mut self, depth_remaining: i16) -> Result<Value<'de>, ParseError> {
        if depth_remaining < 0 {
            return Err(self.fail(ErrorKind::RecursionLimit));
        }
        let Some(b) = self.peek_byte() else {
            return Err(self.fail(ErrorKind::UnexpectedEof));
        };
        match b {
            b'"' | b'\'' => Ok(Value::String(self.parse_string_value(b)?)),
            b'[' => {
                self.cursor += 1;
                Ok(Value::Array(self.parse_array(depth_remaining - 1)?))
            }
            b'{' => {
                self.cursor += 1;
                Ok(Value::Table(self.parse_inline_table(depth_remaining - 1)?))
            }
            _ => self.parse_scalar(b),
        }
    }

    fn parse_scalar(&mut self, first: u8) -> Result<Value<'de>, ParseError> {
        // Dates and times are discriminated before generic number parsing.
        // The munch is speculative: `Ok(None)` restores nothing because
        // nothing was consumed.
        if first.is_ascii_digit() {
            match Datetime::munch(&self.bytes()[self.cursor..]) {
                Ok(Some((consumed, value))) => {
                    self.cursor += consumed;
                    return Ok(match value {
                        Datetime::Local(dt) => Value::LocalDatetime(dt),
                        Datetime::Offset(dt) => Value::OffsetDatetime(dt),
                    });
                }
                Ok(None) => {}
                Err(e) => return Err(self.fail(ErrorKind::MalformedDatetime(e))),
            }
        }
        let token = self.read_value_token();
        match token {
            "" => {
                let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                Err(self.fail(ErrorKind::UnexpectedChar(c)))
            }
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            "inf" | "+inf" => Ok(Value::Float(f64::INFINITY)),
            "-inf" => Ok(Value::Float(f64::NEG_INFINITY)),
            "nan" | "+nan" => Ok(Value::Float(f64::NAN.copysign(1.0))),
            "-nan" => Ok(Value::Float(f64::NAN.copysign(-1.0))),
            _ if matches!(token.as_bytes()[0], b'0'..=b'9' | b'+' | b'-' | b'.') => {
                self.parse_number(token)
            }
            _ => {
                let c = token.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                Err(self.fail(ErrorKind::UnexpectedChar(c)))
            }
        }
    }

    fn parse_number(&mut self, token: &str) -> Result<Value<'de>, ParseError> {
        let (negative, digits) = match token.as_bytes()[0] {
            b'+' => (false, &token[1..]),
            b'-' => (true, &token[1..]),
            _ => (false, token),
        };
        let bytes = digits.as_bytes();

        // Base-prefixed integers. The sign was peeled off first and is
        // applied to the decoded magnitude.
        if let [b'0', prefix, rest @ ..] = bytes {
            let base = match prefix {
                b'x' | b'X' => 16,
                b'o' | b'O' => 8,
                b'b' | b'B' => 2,
                _ => 0,
            };
            if base != 0 {
                return self.parse_radix_integer(rest, base, negative);
            }
        }

        if let [b'0', b'0'..=b'9', ..] = bytes {
            return Err(self.fail(ErrorKind::LeadingZero));
        }

        if bytes.iter().any(|&b| matches!(b, b'.' | b'e' | b'E')) {
            self.parse_float(token)
        } else {
            self.parse_decimal_integer(bytes, negative)
        }
    }

    fn parse_decimal_integer(
        &mut self,
        bytes: &[u8],
        negative: bool,
    ) -> Result<Value<'de>, ParseError> {
        let mut acc: u64 = 0;
        let mut has_digit = false;
        let mut prev_underscore = false;
        for &b in bytes {
            if b == b'_' {
                if !has_digit || prev_underscore {
                    return Err(self.fail(ErrorKind::InvalidInteger));
                }
                prev_underscore = true;
                continue;
            }
            if !b.is_ascii_digit() {
                return Err(self.fail(ErrorKind::InvalidInteger));
            }
            has_digit = true;
            prev_underscore = false;
            acc = match acc
                .checked_mul(10)
                .and_then(|a| a.checked_add((b - b'0') as u64))
            {
                Some(v) => v,
                None => return Err(self.fail(ErrorKind::InvalidInteger)),
            };
        }
        if !has_digit || prev_underscore {
            return Err(self.fail(ErrorKind::InvalidInteger));
        }
        // One extra magnitude step is available on the negative side.
        let limit = if negative {
            i64::MAX as u64 + 1
        } else {
            i64::MAX as u64
        };
        if acc > limit {
            return Err(self.fail(ErrorKind::InvalidInteger));
        }
        let value = if negative {
            (acc as i64).wrapping_neg()
        } else {
            acc as i64
        };
        Ok(Value::Integer(value))
    }

    fn parse_radix_integer(
        &mut self,
        digits: &[u8],
        base: u32,
        negative: bool,
    ) -> Result<Value<'de>, ParseError> {
        let mut acc: u64 = 0;
        let mut has_digit = false;
        let mut prev_underscore = false;
        for &b in digits {
            if b == b'_' {
                if !has_digit || prev_underscore {
                    return Err(self.fail(ErrorKind::InvalidInteger));
                }
                prev_underscore = true;
                continue;
            }
            let Some(d) = (b as char).to_digit(base) else {
                return Err(self.fail(ErrorKind::InvalidInteger));
            };
            has_digit = true;
            prev_underscore = false;
            acc = match acc
                .checked_mul(base as u64)
                .and_then(|a| a.checked_add(d as u64))
            {
                Some(v) => v,
                None => return Err(self.fail(ErrorKind::InvalidInteger)),
            };
        }
        if !has_digit || prev_underscore || acc > i64::MAX as u64 {
            return Err(self.fail(ErrorKind::InvalidInteger));
        }
        let magnitude = acc as i64;
        Ok(Value::Integer(if negative { -magnitude } else { magnitude }))
    }

    fn parse_float(&mut self, token: &str) -> Result<Value<'de>, ParseError> {
        let bytes = token.as_bytes();
        let mut cleaned = String::with_capacity(bytes.len());
        let mut prev: Option<u8> = None;
        let mut seen_dot = false;
        let mut seen_exp = false;
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'_' => {
                    let prev_digit = matches!(prev, Some(p) if p.is_ascii_digit());
                    let next_digit =
                        matches!(bytes.get(i + 1), Some(n) if n.is_ascii_digit());
                    if !prev_digit || !next_digit {
                        return Err(self.fail(ErrorKind::InvalidFloat));
                    }
                    continue;
                }
                b'.' => {
                    if seen_dot || seen_exp {
                        return Err(self.fail(ErrorKind::InvalidFloat));
                    }
                    seen_dot = true;
                    if !matches!(prev, Some(p) if p.is_ascii_digit()) {
                        return Err(self.fail(ErrorKind::InvalidFloat));
                    }
                }
                b'e' | b'E' => seen_exp = true,
                _ => {}
            }
            prev = Some(b);
            cleaned.push(b as char);
        }
        // Trailing dot is allowed only when an exponent follows it.
        if seen_dot && !seen_exp && bytes.last() == Some(&b'.') {
            return Err(self.fail(ErrorKind::InvalidFloat));
        }
        match cleaned.parse::<f64>() {
            // Overflow to an infinity means the literal was out of range;
            // the spellable specials (inf/nan) never reach this path.
            Ok(v) if v.is_finite() => Ok(Value::Float(v)),
            _ => Err(self.fail(ErrorKind::InvalidFloat)),
        }
    }

    // ── containers ──────────────────────────────────────────────────

    /// Cursor is past the opening `[`. Newlines and comments are allowed
    /// between elements; a trailing comma is allowed.
    fn parse_array(&mut self, depth_remaining: i16) -> Result<Array<'de>, ParseError> {
        let mut array = Array::new();
        loop {
            self.skip_trivia();
            if self.eat_byte(b']') {
                return Ok(array);
            }
            let value = self.parse_value(depth_remaining)?;
            array.push(value);
            self.skip_trivia();
            if !self.eat_byte(b',') {
                break;
            }
        }
        self.expect_byte(b']')?;
        Ok(array)
    }

    /// Cursor is past the opening `{`. Only the no-newline whitespace skip
    /// runs in here, so a line break before `,` or `}` surfaces as an
    /// `expected … but found '\n'` error. Trailing commas are rejected the
    /// same way the source rejects them: a `}` where a key should start.
    fn parse_inline_table(&mut self, depth_remaining: i16) -> Result<Table<'de>, ParseError> {
        let mut table = Table::with_origin(TableOrigin::Inline);
        self.skip_ws_no_nl();
        if self.eat_byte(b'}') {
            return Ok(table);
        }
        loop {
            let (target, key) = self.parse_dotted_path(&mut table)?;
            self.expect_byte(b'=')?;
            self.skip_ws_no_nl();
            let value = self.parse_value(depth_remaining)?;
            self.insert_unique(target, key, value)?;
            self.skip_ws_no_nl();
            if self.eat_byte(b'}') {
                return Ok(table);
            }
            self.expect_byte(b',')?;
            self.skip_ws_no_nl();
        }
    }

    // ── structural engine ───────────────────────────────────────────

    /// Reads `k1.k2.….kn`, navigating through every segment but the last
    /// with the dotted-key rules. Returns the table to assign into and the
    /// final key, with the cursor past any trailing whitespace.
    fn parse_dotted_path<'t>(
        &mut self,
        table: &'t mut Table<'de>,
    ) -> Result<(&'t mut Table<'de>, Cow<'de, str>), ParseError> {
        let mut target = table;
        let mut key = self.parse_key()?;
        self.skip_ws_no_nl();
        while self.eat_byte(b'.') {
            self.skip_ws_no_nl();
            target = self.descend_dotted(target, key)?;
            key = self.parse_key()?;
            self.skip_ws_no_nl();
        }
        Ok((target, key))
    }

    /// Intermediate segment of a dotted key: descend into an existing
    /// table or create one. Inline tables are closed; nothing else may be
    /// traversed.
    fn descend_dotted<'t>(
        &mut self,
        table: &'t mut Table<'de>,
        key: Cow<'de, str>,
    ) -> Result<&'t mut Table<'de>, ParseError> {
        if let Some(at) = table.find_index(&key) {
            return match table.value_at_mut(at) {
                Value::Table(t) if t.origin() == TableOrigin::Inline => {
                    Err(self.fail(ErrorKind::ExtendInlineTable {
                        key: key.as_ref().into(),
                    }))
                }
                Value::Table(t) => Ok(t),
                _ => Err(self.fail(ErrorKind::NotATable {
                    key: key.as_ref().into(),
                })),
            };
        }
        let at = table.push(key, Value::Table(Table::with_origin(TableOrigin::Dotted)));
        match table.value_at_mut(at) {
            Value::Table(t) => Ok(t),
            _ => unreachable!(),
        }
    }

    /// Intermediate segment of a `[header]` path. Arrays built from
    /// `[[header]]`s are traversed through their last entry; static arrays
    /// and non-tables cannot be traversed.
    fn descend_header<'t>(
        &mut self,
        table: &'t mut Table<'de>,
        key: Cow<'de, str>,
    ) -> Result<&'t mut Table<'de>, ParseError> {
        if let Some(at) = table.find_index(&key) {
            return match table.value_at_mut(at) {
                Value::Table(t) if t.origin() == TableOrigin::Inline => {
                    Err(self.fail(ErrorKind::ExtendInlineTable {
                        key: key.as_ref().into(),
                    }))
                }
                Value::Table(t) => Ok(t),
                Value::Array(a) if a.from_headers => match a.last_mut() {
                    Some(Value::Table(t)) => Ok(t),
                    _ => unreachable!("header-built arrays contain only tables"),
                },
                Value::Array(_) => Err(self.fail(ErrorKind::ExtendStaticArray {
                    key: key.as_ref().into(),
                })),
                _ => Err(self.fail(ErrorKind::NotATable {
                    key: key.as_ref().into(),
                })),
            };
        }
        let at = table.push(key, Value::Table(Table::with_origin(TableOrigin::Implicit)));
        match table.value_at_mut(at) {
            Value::Table(t) => Ok(t),
            _ => unreachable!(),
        }
    }

    /// Final segment of a standard `[a.b.c]` header. A table that was only
    /// implicit (or created by dotted keys) is claimed; an explicitly
    /// opened one is a redefinition.
    fn open_table<'t>(
        &mut self,
        table: &'t mut Table<'de>,
        key: Cow<'de, str>,
    ) -> Result<&'t mut Table<'de>, ParseError> {
        if let Some(at) = table.find_index(&key) {
            return match table.value_at_mut(at) {
                Value::Table(t) => match t.origin() {
                    TableOrigin::Explicit => {
                        Err(self.fail(ErrorKind::DuplicateTable {
                            name: key.as_ref().into(),
                        }))
                    }
                    TableOrigin::Inline => Err(self.fail(ErrorKind::DuplicateKey {
                        key: key.as_ref().into(),
                    })),
                    _ => {
                        t.set_origin(TableOrigin::Explicit);
                        Ok(t)
                    }
                },
                Value::Array(a) if a.from_headers => match a.last_mut() {
                    Some(Value::Table(t)) => Ok(t),
                    _ => unreachable!("header-built arrays contain only tables"),
                },
                Value::Array(_) => Err(self.fail(ErrorKind::ExtendStaticArray {
                    key: key.as_ref().into(),
                })),
                _ => Err(self.fail(ErrorKind::NotATable {
                    key: key.as_ref().into(),
                })),
            };
        }
        let at = table.push(key, Value::Table(Table::with_origin(TableOrigin::Explicit)));
        match table.value_at_mut(at) {
            Value::Table(t) => Ok(t),
            _ => unreachable!(),
        }
    }

    /// Final segment of an `[[a.b.c]]` header: append a fresh table to the
    /// array, creating the array on first sight.
    fn open_array_entry<'t>(
        &mut self,
        table: &'t mut Table<'de>,
        key: Cow<'de, str>,
    ) -> Result<&'t mut Table<'de>, ParseError> {
        if let Some(at) = table.find_index(&key) {
            return match table.value_at_mut(at) {
                Value::Array(a) if a.from_headers => {
                    a.push(Value::Table(Table::with_origin(TableOrigin::Explicit)));
                    match a.last_mut() {
                        Some(Value::Table(t)) => Ok(t),
                        _ => unreachable!(),
                    }
                }
                _ => Err(self.fail(ErrorKind::NotArrayOfTables {
                    key: key.as_ref().into(),
                })),
            };
        }
        let entry = Value::Table(Table::with_origin(TableOrigin::Explicit));
        let at = table.push(key, Value::Array(Array::from_headers_with(entry)));
        match table.value_at_mut(at) {
            Value::Array(a) => match a.last_mut() {
                Some(Value::Table(t)) => Ok(t),
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }

    fn insert_unique(
        &mut self,
        table: &mut Table<'de>,
        key: Cow<'de, str>,
        value: Value<'de>,
    ) -> Result<(), ParseError> {
        if table.find_index(&key).is_some() {
            return Err(self.fail(ErrorKind::DuplicateKey {
                key: key.as_ref().into(),
            }));
        }
        table.push(key, value);
        Ok(())
    }

    // ── document driver ─────────────────────────────────────────────

    /// Cursor is on the opening `[`. Repositions parsing into the named
    /// table (or the fresh entry of an array of tables).
    fn parse_table_header<'t>(
        &mut self,
        root: &'t mut Table<'de>,
    ) -> Result<&'t mut Table<'de>, ParseError> {
        self.expect_byte(b'[')?;
        let is_array = self.eat_byte(b'[');
        self.skip_ws_no_nl();
        let mut current: &mut Table<'de> = root;
        let mut key = self.parse_key()?;
        self.skip_ws_no_nl();
        while self.eat_byte(b'.') {
            self.skip_ws_no_nl();
            current = self.descend_header(current, key)?;
            key = self.parse_key()?;
            self.skip_ws_no_nl();
        }
        self.expect_byte(b']')?;
        if is_array {
            self.expect_byte(b']')?;
        }
        if is_array {
            self.open_array_entry(current, key)
        } else {
            self.open_table(current, key)
        }
    }

    /// Key-value pairs into `table` until a header or end of input.
    fn parse_table_body(&mut self, table: &mut Table<'de>) -> Result<(), ParseError> {
        loop {
            self.skip_trivia();
            match self.peek_byte() {
                None | Some(b'[') => return Ok(()),
                _ => self.parse_key_value(table)?,
            }
        }
    }

    fn parse_key_value(&mut self, table: &mut Table<'de>) -> Result<(), ParseError> {
        let (target, key) = self.parse_dotted_path(table)?;
        self.expect_byte(b'=')?;
        self.skip_ws_no_nl();
        let value = self.parse_value(MAX_RECURSION_DEPTH)?;
        self.insert_unique(target, key, value)
    }

    fn parse_document(&mut self, root: &mut Table<'de>) -> Result<(), ParseError> {
        self.parse_table_body(root)?;
        loop {
            self.skip_trivia();
            if self.eof() {
                return Ok(());
            }
            let current = self.parse_table_header(root)?;
            self.parse_table_body(current)?;
        }
    }
}

/// Parses a TOML document into its root [`Table`].
///
/// The returned tree borrows from `input`: bare keys and escape-free
/// strings are zero-copy slices of it. On failure the first error
/// encountered is returned and the partial tree is discarded.
pub fn parse<'de>(input: &'de str) -> Result<Table<'de>, Error> {
    if scan::find_forbidden(input.as_bytes()).is_some() {
        return Err(Error {
            kind: ErrorKind::ForbiddenControlChar,
        });
    }
    let mut parser = Parser::new(input);
    let mut root = Table::with_origin(TableOrigin::Root);
    match parser.parse_document(&mut root) {
        Ok(()) => Ok(root),
        Err(ParseError) => Err(parser.take_error()),
    }
}

#[inline]
fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Bytes that may follow a complete scalar value.
#[inline]
fn is_value_terminator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}' | b'#')
}
