//! YAML serializer
//!
//! Block style throughout, including lists nested in lists. Strings are
//! double-quoted with `\\`, `\"` and control escapes unless they are
//! ISO-8601 UTC timestamps. Keys stay plain only when the parser would read
//! them back unchanged.

use super::{
    child_path, format_datetime, format_float, root_map, unrepresentable, FormatWriter,
    SerializeError,
};
use crate::format::Format;
use crate::models::{is_iso_utc_datetime, ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use regex::Regex;

static_regex!(fn plain_key_pattern, r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$");

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlWriter;

impl FormatWriter for YamlWriter {
    fn serialize(&self, value: &ConfigValue) -> Result<String, SerializeError> {
        serialize_yaml(value)
    }
}

pub fn serialize_yaml(value: &ConfigValue) -> Result<String, SerializeError> {
    let map = root_map(value, Format::Yaml)?;
    let mut lines = Vec::new();
    write_map(&mut lines, map, 0, "")?;
    Ok(lines.join("\n"))
}

fn pad(level: usize) -> String {
    "  ".repeat(level)
}

fn write_map(
    lines: &mut Vec<String>,
    map: &ConfigMap,
    level: usize,
    path: &str,
) -> Result<(), SerializeError> {
    let pad = pad(level);

    for (key, value) in map {
        let path = child_path(path, key);
        let key = format_key(key);
        match value {
            ConfigValue::Map(nested) if nested.is_empty() => {
                lines.push(format!("{}{}: {{}}", pad, key));
            }
            ConfigValue::Map(nested) => {
                lines.push(format!("{}{}:", pad, key));
                write_map(lines, nested, level + 1, &path)?;
                lines.push(String::new());
            }
            ConfigValue::Array(items) if items.is_empty() => {
                lines.push(format!("{}{}: []", pad, key));
            }
            ConfigValue::Array(items) => {
                lines.push(format!("{}{}:", pad, key));
                write_items(lines, items, level + 1, &path)?;
            }
            scalar => {
                lines.push(format!("{}{}: {}", pad, key, format_scalar(scalar, &path)?));
            }
        }
    }

    Ok(())
}

fn write_items(
    lines: &mut Vec<String>,
    items: &[ConfigValue],
    level: usize,
    path: &str,
) -> Result<(), SerializeError> {
    let pad = pad(level);

    for (i, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", path, i);
        match item {
            ConfigValue::Map(map) if map.is_empty() => lines.push(format!("{}- {{}}", pad)),
            ConfigValue::Map(map) => {
                lines.push(format!("{}-", pad));
                write_map(lines, map, level + 1, &path)?;
                lines.push(String::new());
            }
            ConfigValue::Array(nested) if nested.is_empty() => lines.push(format!("{}- []", pad)),
            ConfigValue::Array(nested) => {
                lines.push(format!("{}-", pad));
                write_items(lines, nested, level + 1, &path)?;
            }
            scalar => lines.push(format!("{}- {}", pad, format_scalar(scalar, &path)?)),
        }
    }

    Ok(())
}

fn format_key(key: &str) -> String {
    if plain_key_pattern().is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_scalar(value: &ConfigValue, path: &str) -> Result<String, SerializeError> {
    Ok(match value {
        ConfigValue::Null => "null".to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Int(i) => i.to_string(),
        ConfigValue::Float(f) => format_float(*f, Format::Yaml, path)?,
        ConfigValue::DateTime(dt) => format_datetime(dt),
        ConfigValue::String(s) if is_iso_utc_datetime(s) => s.clone(),
        ConfigValue::String(s) => quote(s),
        ConfigValue::Array(_) | ConfigValue::Map(_) => {
            return Err(unrepresentable(Format::Yaml, path, "expected a scalar"))
        }
    })
}
