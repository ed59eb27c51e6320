//! YAML parser
//!
//! Covers the block subset used by configuration files: nested mappings,
//! block sequences, flow sequences of scalars, comments and folded plain
//! continuation lines. Anchors, tags, multi-document streams and block
//! scalars are not supported.

use super::{split_top_level, strip_inline_comment, FormatParser, ParseError};
use crate::models::{ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

static_regex!(fn int_pattern, r"^[-+]?\d+$");
static_regex!(fn float_pattern, r"^[-+]?(\d+\.\d*|\.\d+|\d+)([eE][-+]?\d+)?$");
static_regex!(fn date_pattern, r"^\d{4}-\d{2}-\d{2}$");
static_regex!(fn datetime_pattern, r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}$");

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl FormatParser for YamlParser {
    fn parse(&self, text: &str) -> Result<ConfigValue, ParseError> {
        parse_yaml(text)
    }
}

/// Parse a YAML document. Empty or comment-only input is an empty map.
pub fn parse_yaml(text: &str) -> Result<ConfigValue, ParseError> {
    let lines = scan_lines(text)?;
    if lines.is_empty() {
        return Ok(ConfigValue::empty_map());
    }

    let value = parse_block(&lines)?;
    debug!(lines = lines.len(), root = value.type_name(), "parsed YAML document");
    Ok(value)
}

/// One meaningful source line
#[derive(Debug, Clone, Copy)]
struct YamlLine<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

fn error(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Yaml {
        line,
        message: message.into(),
    }
}

fn scan_lines(text: &str) -> Result<Vec<YamlLine<'_>>, ParseError> {
    let mut lines = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let number = index + 1;
        let raw = raw.trim_end_matches('\r');

        let leading = raw.len() - raw.trim_start_matches([' ', '\t']).len();
        if raw[..leading].contains('\t') {
            return Err(error(number, "Tab characters are not allowed for indentation"));
        }

        let content = strip_inline_comment(&raw[leading..]).trim_end();
        if content.is_empty() || (leading == 0 && content == "---") {
            continue;
        }

        lines.push(YamlLine {
            number,
            indent: leading,
            content,
        });
    }

    Ok(lines)
}

fn is_list_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

/// Split `key: value` at the first colon outside quotes that is followed by
/// a space or ends the line.
fn split_key(content: &str) -> Option<(&str, &str)> {
    let bytes = content.as_bytes();
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' && q == b'"' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b':' if i + 1 == bytes.len() || bytes[i + 1] == b' ' => {
                return Some((content[..i].trim(), content[i + 1..].trim()));
            }
            _ => {}
        }
    }

    None
}

/// Strip one layer of quotes from a scalar or key. Double quotes decode the
/// escapes `\\`, `\"`, `\n`, `\r` and `\t`; single quotes decode `''`.
/// Text whose quotes do not close exactly at its end is returned as written.
fn unquote(text: &str) -> Cow<'_, str> {
    let decoded = match text.chars().next() {
        Some('"') => decode_double_quoted(&text[1..]),
        Some('\'') => decode_single_quoted(&text[1..]),
        _ => None,
    };
    decoded.map_or(Cow::Borrowed(text), Cow::Owned)
}

fn decode_double_quoted(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return chars.as_str().is_empty().then_some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            },
            c => out.push(c),
        }
    }

    None
}

fn decode_single_quoted(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\'' {
            out.push(c);
        } else if chars.peek() == Some(&'\'') {
            chars.next();
            out.push('\'');
        } else {
            return chars.next().is_none().then_some(out);
        }
    }

    None
}

/// End (exclusive) of the run of lines after `start` that are deeper than `indent`
fn deeper_end(lines: &[YamlLine<'_>], start: usize, indent: usize) -> usize {
    let mut end = start;
    while end < lines.len() && lines[end].indent > indent {
        end += 1;
    }
    end
}

fn parse_block(lines: &[YamlLine<'_>]) -> Result<ConfigValue, ParseError> {
    let first = lines[0];
    if is_list_item(first.content) {
        parse_sequence(lines)
    } else if split_key(first.content).is_some() {
        parse_mapping(lines)
    } else {
        Err(error(
            first.number,
            "Invalid line format: expected 'key: value' or '- item'",
        ))
    }
}

fn check_indent(line: &YamlLine<'_>, indent: usize) -> Result<(), ParseError> {
    if line.indent != indent {
        return Err(error(
            line.number,
            format!(
                "Indentation mismatch: expected {} spaces, found {}",
                indent, line.indent
            ),
        ));
    }
    Ok(())
}

fn parse_mapping(lines: &[YamlLine<'_>]) -> Result<ConfigValue, ParseError> {
    let indent = lines[0].indent;
    let mut map = ConfigMap::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        check_indent(&line, indent)?;
        if is_list_item(line.content) {
            return Err(error(
                line.number,
                "Cannot mix list items and mapping entries at the same level",
            ));
        }

        let (key, raw_value) = split_key(line.content).ok_or_else(|| {
            error(
                line.number,
                "Invalid line format: expected 'key: value' or '- item'",
            )
        })?;
        if key.is_empty() {
            return Err(error(line.number, "Empty key"));
        }
        let key = unquote(key).into_owned();

        let children_end = deeper_end(lines, i + 1, indent);
        let children = &lines[i + 1..children_end];

        let value = if !raw_value.is_empty() {
            i = children_end;
            fold_scalar(raw_value, children)?
        } else if !children.is_empty() {
            i = children_end;
            parse_block(children)?
        } else {
            // A sequence may sit at the key's own indentation
            let mut end = i + 1;
            while end < lines.len()
                && lines[end].indent == indent
                && is_list_item(lines[end].content)
            {
                end = deeper_end(lines, end + 1, indent);
            }
            let items = &lines[i + 1..end];
            i = end;
            if items.is_empty() {
                ConfigValue::empty_map()
            } else {
                parse_sequence(items)?
            }
        };

        if map.insert(key.clone(), value).is_some() {
            debug!(key = %key, line = line.number, "duplicate YAML key overwritten");
        }
    }

    Ok(ConfigValue::Map(map))
}

fn parse_sequence(lines: &[YamlLine<'_>]) -> Result<ConfigValue, ParseError> {
    let indent = lines[0].indent;
    let mut items = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        check_indent(&line, indent)?;
        if !is_list_item(line.content) {
            let message = if split_key(line.content).is_some() {
                "Cannot mix list items and mapping entries at the same level"
            } else {
                "Invalid line format: expected 'key: value' or '- item'"
            };
            return Err(error(line.number, message));
        }

        let children_end = deeper_end(lines, i + 1, indent);
        let children = &lines[i + 1..children_end];
        i = children_end;

        let rest = line.content[1..].trim_start();
        let item = if rest.is_empty() {
            if children.is_empty() {
                ConfigValue::Null
            } else {
                parse_block(children)?
            }
        } else if is_list_item(rest) || split_key(rest).is_some() {
            let column = indent + (line.content.len() - rest.len());
            let mut block = Vec::with_capacity(children.len() + 1);
            block.push(YamlLine {
                number: line.number,
                indent: column,
                content: rest,
            });
            block.extend_from_slice(children);
            parse_block(&block)?
        } else {
            if let Some(child) = children.first() {
                return Err(error(child.number, "Unexpected indentation"));
            }
            parse_scalar(rest)
        };

        items.push(item);
    }

    Ok(ConfigValue::Array(items))
}

/// Join plain continuation lines onto a mapping value
fn fold_scalar(value: &str, continuation: &[YamlLine<'_>]) -> Result<ConfigValue, ParseError> {
    if continuation.is_empty() {
        return Ok(parse_scalar(value));
    }

    let mut folded = value.to_string();
    for line in continuation {
        if is_list_item(line.content) || split_key(line.content).is_some() {
            return Err(error(line.number, "Unexpected indentation"));
        }
        folded.push(' ');
        folded.push_str(line.content.trim());
    }
    Ok(parse_scalar(&folded))
}

/// Infer the type of a plain or quoted scalar
fn parse_scalar(text: &str) -> ConfigValue {
    let text = text.trim();

    match text {
        "null" | "Null" | "NULL" | "~" => return ConfigValue::Null,
        "true" | "True" => return ConfigValue::Bool(true),
        "false" | "False" => return ConfigValue::Bool(false),
        "[]" => return ConfigValue::Array(Vec::new()),
        "{}" => return ConfigValue::empty_map(),
        _ => {}
    }

    if int_pattern().is_match(text) {
        if let Ok(int) = text.parse::<i64>() {
            return ConfigValue::Int(int);
        }
    }

    if float_pattern().is_match(text) {
        if let Ok(float) = text.parse::<f64>() {
            return ConfigValue::Float(float);
        }
    }

    if date_pattern().is_match(text) {
        if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return ConfigValue::DateTime(midnight);
        }
        return ConfigValue::String(text.to_string());
    }

    if datetime_pattern().is_match(text) {
        let normalized = text.replacen(' ', "T", 1);
        return match NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S") {
            Ok(datetime) => ConfigValue::DateTime(datetime),
            Err(_) => ConfigValue::String(text.to_string()),
        };
    }

    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        if let Ok(parts) = split_top_level(inner) {
            return ConfigValue::Array(parts.into_iter().map(parse_scalar).collect());
        }
    }

    ConfigValue::String(unquote(text).into_owned())
}
