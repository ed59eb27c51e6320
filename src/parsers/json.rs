//! JSON parser
//!
//! A recursive-descent parser over byte offsets into the input text.
//! Objects and arrays are isolated by bracket matching before their members
//! are parsed, and every value parse knows the offset where its remaining
//! input starts so errors can name a line.

use super::{FormatParser, LineIndex, ParseError};
use crate::models::{ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use regex::Regex;
use tracing::debug;

static_regex!(fn integer_pattern, r"^[+-]?\d+$");

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl FormatParser for JsonParser {
    fn parse(&self, text: &str) -> Result<ConfigValue, ParseError> {
        parse_json(text)
    }
}

/// Parse a JSON document. Empty or whitespace-only input is an empty map.
pub fn parse_json(text: &str) -> Result<ConfigValue, ParseError> {
    if text.trim().is_empty() {
        return Ok(ConfigValue::empty_map());
    }

    let cursor = JsonCursor::new(text);
    let (value, after) = cursor.parse_value(0, text.len())?;
    let rest = cursor.skip_whitespace(after, text.len());
    if rest < text.len() {
        return Err(cursor.error(rest, "Extra data after JSON value"));
    }

    debug!(bytes = text.len(), root = value.type_name(), "parsed JSON document");
    Ok(value)
}

#[derive(Clone, Copy)]
enum Container {
    Object,
    Array,
}

impl Container {
    fn name(self) -> &'static str {
        match self {
            Container::Object => "object",
            Container::Array => "array",
        }
    }

    fn open(self) -> u8 {
        match self {
            Container::Object => b'{',
            Container::Array => b'[',
        }
    }

    fn close(self) -> u8 {
        match self {
            Container::Object => b'}',
            Container::Array => b']',
        }
    }
}

struct JsonCursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    lines: LineIndex,
}

impl<'a> JsonCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            lines: LineIndex::new(text),
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::Json {
            line: self.lines.line_of(offset),
            message: message.into(),
        }
    }

    fn skip_whitespace(&self, mut pos: usize, end: usize) -> usize {
        while pos < end && matches!(self.bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
            pos += 1;
        }
        pos
    }

    /// Parse one value from the input that starts at `start` and may extend
    /// up to `end`. Returns the value and the offset just past it.
    fn parse_value(&self, start: usize, end: usize) -> Result<(ConfigValue, usize), ParseError> {
        let pos = self.skip_whitespace(start, end);
        if pos >= end {
            return Err(self.error(start, "Expected value"));
        }

        let rest = &self.text[pos..end];
        match self.bytes[pos] {
            b'{' => self.parse_container(Container::Object, pos, end, start),
            b'[' => self.parse_container(Container::Array, pos, end, start),
            b'"' => {
                let (s, after) = self.parse_string(pos, end, start)?;
                Ok((ConfigValue::String(s), after))
            }
            _ if rest.starts_with("true") => Ok((ConfigValue::Bool(true), pos + 4)),
            _ if rest.starts_with("false") => Ok((ConfigValue::Bool(false), pos + 5)),
            _ if rest.starts_with("null") => Ok((ConfigValue::Null, pos + 4)),
            _ => self.parse_number(pos, end, start),
        }
    }

    fn parse_container(
        &self,
        kind: Container,
        open: usize,
        end: usize,
        start: usize,
    ) -> Result<(ConfigValue, usize), ParseError> {
        let close = self.find_closing(kind, open, end, start)?;
        let value = match kind {
            Container::Object => self.parse_members(open, close)?,
            Container::Array => self.parse_elements(open, close)?,
        };
        Ok((value, close + 1))
    }

    /// Locate the bracket closing the one at `open`, counting only brackets of
    /// the same kind and skipping string contents. A quote with no partner is
    /// scanned as an ordinary character; the member parse reports it later.
    fn find_closing(
        &self,
        kind: Container,
        open: usize,
        end: usize,
        start: usize,
    ) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut pos = open;

        while pos < end {
            let b = self.bytes[pos];
            if b == b'"' {
                if let Some(after) = self.skip_string(pos, end) {
                    pos = after;
                    continue;
                }
            }
            if b == kind.open() {
                depth += 1;
            } else if b == kind.close() {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
            pos += 1;
        }

        Err(self.error(
            start,
            format!(
                "Invalid JSON {}: No matching closing brace for '{}'",
                kind.name(),
                kind.open() as char
            ),
        ))
    }

    /// Offset just past the string opening at `pos`, if it is closed
    fn skip_string(&self, pos: usize, end: usize) -> Option<usize> {
        let mut i = pos + 1;
        while i < end {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'"' => return Some(i + 1),
                _ => i += 1,
            }
        }
        None
    }

    fn parse_members(&self, open: usize, close: usize) -> Result<ConfigValue, ParseError> {
        let mut map = ConfigMap::new();
        let mut pos = self.skip_whitespace(open + 1, close);

        while pos < close {
            if self.bytes[pos] != b'"' {
                return Err(self.error(pos, "Expected string key in double quotes"));
            }
            let (key, after_key) = self.parse_string(pos, close, pos)?;

            pos = self.skip_whitespace(after_key, close);
            if pos >= close || self.bytes[pos] != b':' {
                return Err(self.error(pos, "Expected ':' or quotes after key"));
            }

            let (value, after_value) = self.parse_value(pos + 1, close)?;
            if map.insert(key.clone(), value).is_some() {
                debug!(key = %key, "duplicate JSON key overwritten");
            }

            pos = self.skip_whitespace(after_value, close);
            if pos >= close {
                break;
            }
            pos = self.expect_separator(Container::Object, pos, close)?;
        }

        Ok(ConfigValue::Map(map))
    }

    fn parse_elements(&self, open: usize, close: usize) -> Result<ConfigValue, ParseError> {
        let mut items = Vec::new();
        let mut pos = open + 1;

        if self.skip_whitespace(pos, close) >= close {
            return Ok(ConfigValue::Array(items));
        }

        loop {
            let (value, after_value) = self.parse_value(pos, close)?;
            items.push(value);

            pos = self.skip_whitespace(after_value, close);
            if pos >= close {
                break;
            }
            pos = self.expect_separator(Container::Array, pos, close)?;
        }

        Ok(ConfigValue::Array(items))
    }

    /// Consume the `,` after a member and reject a trailing comma. Returns the
    /// offset just past the comma.
    fn expect_separator(
        &self,
        kind: Container,
        pos: usize,
        close: usize,
    ) -> Result<usize, ParseError> {
        if self.bytes[pos] != b',' {
            return Err(self.error(
                pos,
                format!(
                    "Expected ',' or '{}' or quotes after value",
                    kind.close() as char
                ),
            ));
        }
        if self.skip_whitespace(pos + 1, close) >= close {
            return Err(self.error(pos, format!("Trailing comma in JSON {}", kind.name())));
        }
        let next = pos + 1;
        match kind {
            Container::Object => Ok(self.skip_whitespace(next, close)),
            Container::Array => Ok(next),
        }
    }

    /// Decode the string whose opening quote is at `pos`. Returns the decoded
    /// text and the offset just past the closing quote.
    fn parse_string(
        &self,
        pos: usize,
        end: usize,
        start: usize,
    ) -> Result<(String, usize), ParseError> {
        let mut out = String::new();
        let body = &self.text[pos + 1..end];
        let mut chars = body.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((out, pos + 1 + i + 1)),
                '\\' => {
                    let (_, escape) = chars
                        .next()
                        .ok_or_else(|| self.error(start, "Unterminated string"))?;
                    match escape {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        '/' => out.push('/'),
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => {
                            let code = self.read_hex4(&mut chars, start)?;
                            out.push(self.decode_code_point(code, &mut chars, start)?);
                        }
                        other => {
                            return Err(self.error(
                                start,
                                format!("Invalid escape character '\\{}'", other),
                            ))
                        }
                    }
                }
                _ => out.push(c),
            }
        }

        Err(self.error(start, "Unterminated string"))
    }

    fn read_hex4(
        &self,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
        start: usize,
    ) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            match chars.peek().map(|&(_, c)| c) {
                Some(c) if c.is_ascii_hexdigit() => {
                    code = code * 16 + c.to_digit(16).unwrap_or(0);
                    chars.next();
                }
                None | Some('"') => {
                    return Err(self.error(start, "Incomplete unicode escape sequence"))
                }
                Some(_) => return Err(self.error(start, "Invalid unicode escape sequence")),
            }
        }
        Ok(code)
    }

    /// Turn a `\u` code unit into a char, pairing UTF-16 surrogates
    fn decode_code_point(
        &self,
        code: u32,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
        start: usize,
    ) -> Result<char, ParseError> {
        if (0xD800..0xDC00).contains(&code) {
            let is_escape = chars.next().map(|(_, c)| c) == Some('\\')
                && chars.next().map(|(_, c)| c) == Some('u');
            if !is_escape {
                return Err(self.error(start, "Invalid unicode escape sequence"));
            }
            let low = self.read_hex4(chars, start)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error(start, "Invalid unicode escape sequence"));
            }
            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(combined)
                .ok_or_else(|| self.error(start, "Invalid unicode escape sequence"));
        }

        char::from_u32(code).ok_or_else(|| self.error(start, "Invalid unicode escape sequence"))
    }

    fn parse_number(
        &self,
        pos: usize,
        end: usize,
        start: usize,
    ) -> Result<(ConfigValue, usize), ParseError> {
        let mut after = pos;
        while after < end && matches!(self.bytes[after], b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
        {
            after += 1;
        }
        let candidate = &self.text[pos..after];

        if candidate.is_empty() {
            return Err(self.error(start, "Expected value. Possibly missing quotes for string."));
        }

        let unsigned = candidate
            .strip_prefix('-')
            .or_else(|| candidate.strip_prefix('+'))
            .unwrap_or(candidate);

        if unsigned.starts_with('.') || candidate.ends_with('.') {
            return Err(self.error(
                start,
                format!("Invalid float number format: '{}'", candidate),
            ));
        }

        let mut digits = unsigned.bytes();
        if digits.next() == Some(b'0') && digits.next().is_some_and(|b| b.is_ascii_digit()) {
            return Err(self.error(
                start,
                format!("Invalid number: leading zeros are not allowed in '{}'", candidate),
            ));
        }

        let invalid = || self.error(start, format!("Invalid number: '{}'", candidate));
        let value = if candidate.contains(['.', 'e', 'E']) {
            ConfigValue::Float(candidate.parse::<f64>().map_err(|_| invalid())?)
        } else if let Ok(int) = candidate.parse::<i64>() {
            ConfigValue::Int(int)
        } else if integer_pattern().is_match(candidate) {
            ConfigValue::Float(candidate.parse::<f64>().map_err(|_| invalid())?)
        } else {
            return Err(invalid());
        };

        Ok((value, after))
    }
}
