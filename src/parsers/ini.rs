//! INI parser
//!
//! `[section]` headers (dotted names nest), `key = value` assignments and
//! `;`/`#` comment lines. Values are typed by inference: null, booleans,
//! comma lists, integers and floats, falling back to the raw text.

use super::{FormatParser, ParseError};
use crate::models::{ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use regex::Regex;
use tracing::debug;

static_regex!(fn int_pattern, r"^[+-]?\d+$");
static_regex!(fn float_pattern, r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$");

#[derive(Debug, Clone, Copy, Default)]
pub struct IniParser;

impl FormatParser for IniParser {
    fn parse(&self, text: &str) -> Result<ConfigValue, ParseError> {
        parse_ini(text)
    }
}

/// Parse an INI document into a map; keys before the first header land in
/// the root map.
pub fn parse_ini(text: &str) -> Result<ConfigValue, ParseError> {
    let mut root = ConfigMap::new();
    let mut section: Vec<String> = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let number = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_header(line, number)?;
            section_at(&mut root, &section, number)?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| error(number, format!("Invalid line: '{}'", line)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(error(number, "Missing key before '='"));
        }

        let table = section_at(&mut root, &section, number)?;
        if table
            .insert(key.to_string(), infer_value(value.trim()))
            .is_some()
        {
            debug!(key, line = number, "duplicate INI key overwritten");
        }
    }

    debug!(sections = root.values().filter(|v| v.is_map()).count(), "parsed INI document");
    Ok(ConfigValue::Map(root))
}

fn error(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Ini {
        line,
        message: message.into(),
    }
}

fn parse_header(line: &str, number: usize) -> Result<Vec<String>, ParseError> {
    let name = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| error(number, "Invalid section header"))?
        .trim();

    if name.is_empty() || name.split('.').any(|part| part.trim().is_empty()) {
        return Err(error(number, "Empty section name"));
    }

    Ok(name.split('.').map(|part| part.trim().to_string()).collect())
}

fn section_at<'m>(
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
                    format!("Section '{}' conflicts with an existing value", part),
                ))
            }
        };
    }
    Ok(table)
}

fn infer_value(text: &str) -> ConfigValue {
    if text.eq_ignore_ascii_case("null") {
        return ConfigValue::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return ConfigValue::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return ConfigValue::Bool(false);
    }

    if text.contains(',') {
        return ConfigValue::Array(
            text.split(',')
                .map(|item| ConfigValue::String(item.trim().to_string()))
                .collect(),
        );
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

    ConfigValue::String(text.to_string())
}
