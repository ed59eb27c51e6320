//! TOML parser
//!
//! Line-oriented: each line is a comment, a `[section]` header or a
//! `key = value` assignment. Values cover strings, booleans, numbers and
//! (nested) arrays. Date-times are kept as literal strings. Inline tables and
//! arrays of tables are not supported.

use super::{split_top_level, strip_inline_comment, FormatParser, ParseError, SplitError};
use crate::models::{ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use regex::Regex;
use tracing::debug;

static_regex!(fn bare_key_pattern, r"^[A-Za-z0-9_-]+$");
static_regex!(fn int_pattern, r"^[+-]?\d+$");
static_regex!(fn float_pattern, r"^[+-]?\d+(\.\d+)?([eE][+-]?\d+)?$");
static_regex!(fn leading_date_pattern, r"^\d{4}-\d{2}-\d{2}");

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl FormatParser for TomlParser {
    fn parse(&self, text: &str) -> Result<ConfigValue, ParseError> {
        parse_toml(text)
    }
}

/// Parse a TOML document into a map
pub fn parse_toml(text: &str) -> Result<ConfigValue, ParseError> {
    let mut root = ConfigMap::new();
    let mut section: Vec<String> = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let number = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_header(line, number)?;
            table_at(&mut root, &section, number)?;
        } else if let Some((key, value)) = line.split_once('=') {
            let (key, value) = parse_assignment(key, value, number)?;
            let table = table_at(&mut root, &section, number)?;
            if table.contains_key(&key) {
                return Err(error(number, format!("Duplicate key '{}'", key)));
            }
            table.insert(key, value);
        } else {
            return Err(error(
                number,
                "Invalid line format: expected 'key = value' or '[section]'",
            ));
        }
    }

    debug!(keys = root.len(), "parsed TOML document");
    Ok(ConfigValue::Map(root))
}

fn error(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Toml {
        line,
        message: message.into(),
    }
}

fn parse_header(line: &str, number: usize) -> Result<Vec<String>, ParseError> {
    let header = strip_inline_comment(line).trim();

    if header.starts_with("[[") {
        return Err(error(number, "Arrays of tables are not supported"));
    }
    let inner = header
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .ok_or_else(|| error(number, "Invalid section header"))?
        .trim();
    if inner.is_empty() {
        return Err(error(number, "Empty section header"));
    }

    inner
        .split('.')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                Err(error(
                    number,
                    format!("Invalid section name '{}': empty part", inner),
                ))
            } else if !bare_key_pattern().is_match(part) {
                Err(error(number, format!("Invalid section name '{}'", part)))
            } else {
                Ok(part.to_string())
            }
        })
        .collect()
}

/// Walk from the root to the table named by `path`, creating missing tables
fn table_at<'m>(
    root: &'m mut ConfigMap,
    path: &[String],
    number: usize,
) -> Result<&'m mut ConfigMap, ParseError> {
    let mut table = root;
    for part in path {
        let entry = table
            .entry(part.clone())
            .or_insert_with(ConfigValue::empty_map);
        table = match entry {
            ConfigValue::Map(map) => map,
            _ => {
                return Err(error(
                    number,
                    format!("Key '{}' is already defined as a non-table value", part),
                ))
            }
        };
    }
    Ok(table)
}

fn parse_assignment(
    key: &str,
    value: &str,
    number: usize,
) -> Result<(String, ConfigValue), ParseError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(error(number, "Missing key before '='"));
    }
    if !bare_key_pattern().is_match(key) {
        return Err(error(number, format!("Invalid key format: '{}'", key)));
    }

    let value = strip_inline_comment(value).trim();
    if value.is_empty() {
        return Err(error(number, format!("Missing value for key '{}'", key)));
    }

    Ok((key.to_string(), parse_value(value, number)?))
}

fn parse_value(text: &str, number: usize) -> Result<ConfigValue, ParseError> {
    let text = text.trim();

    if text.eq_ignore_ascii_case("true") {
        return Ok(ConfigValue::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(ConfigValue::Bool(false));
    }

    if text.starts_with('"') || text.starts_with('\'') {
        return parse_string(text, number).map(ConfigValue::String);
    }

    if text.starts_with('[') {
        return parse_array(text, number);
    }

    if int_pattern().is_match(text) {
        return text
            .parse::<i64>()
            .map(ConfigValue::Int)
            .map_err(|_| error(number, "Integer out of range"));
    }

    if float_pattern().is_match(text) {
        if let Ok(float) = text.parse::<f64>() {
            return Ok(ConfigValue::Float(float));
        }
    }

    if leading_date_pattern().is_match(text) {
        debug!(value = text, line = number, "keeping TOML date-time as a string");
    }
    Ok(ConfigValue::String(text.to_string()))
}

/// Decode a single- or double-quoted string. Both styles accept the escapes
/// `\n`, `\t`, `\"`, `\'` and `\\`; any other escape is kept as written.
fn parse_string(text: &str, number: usize) -> Result<String, ParseError> {
    let mut chars = text.chars();
    let quote = chars.next().unwrap_or('"');
    let mut out = String::new();

    while let Some(c) = chars.next() {
        if c == quote {
            let trailing = chars.as_str().trim();
            if !trailing.is_empty() {
                return Err(error(
                    number,
                    format!("Unexpected characters after string: '{}'", trailing),
                ));
            }
            return Ok(out);
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => break,
        }
    }

    Err(error(number, "Unterminated string"))
}

fn parse_array(text: &str, number: usize) -> Result<ConfigValue, ParseError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| error(number, "Unterminated array"))?;
    if inner.trim().is_empty() {
        return Ok(ConfigValue::Array(Vec::new()));
    }

    let mut parts = split_top_level(inner).map_err(|e| match e {
        SplitError::UnterminatedQuote => error(number, "Unterminated string in array"),
    })?;
    if parts.last().is_some_and(|last| last.trim().is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .map(|part| {
            if part.trim().is_empty() {
                Err(error(number, "Empty array element"))
            } else {
                parse_value(part, number)
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ConfigValue::Array)
}
