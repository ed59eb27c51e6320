//! TOML serializer
//!
//! Root scalars come first, then one `[section]` block per map, with nested
//! maps written under dotted headers.

use super::{
    child_path, format_datetime, format_float, root_map, unrepresentable, FormatWriter,
    SerializeError,
};
use crate::format::Format;
use crate::models::{is_iso_utc_datetime, ConfigMap, ConfigValue};
use crate::regex_util::static_regex;
use regex::Regex;

static_regex!(fn bare_key_pattern, r"^[A-Za-z0-9_-]+$");

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlWriter;

impl FormatWriter for TomlWriter {
    fn serialize(&self, value: &ConfigValue) -> Result<String, SerializeError> {
        serialize_toml(value)
    }
}

pub fn serialize_toml(value: &ConfigValue) -> Result<String, SerializeError> {
    let root = root_map(value, Format::Toml)?;
    let mut blocks: Vec<Vec<String>> = Vec::new();

    let root_lines = write_assignments(root, "")?;
    if !root_lines.is_empty() {
        blocks.push(root_lines);
    }
    write_tables(&mut blocks, root, "")?;

    Ok(blocks
        .iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// `key = value` lines for every non-map entry of `map`
fn write_assignments(map: &ConfigMap, path: &str) -> Result<Vec<String>, SerializeError> {
    let mut lines = Vec::new();
    for (key, value) in map {
        if value.is_map() {
            continue;
        }
        let path = child_path(path, key);
        check_key(key, &path)?;
        lines.push(format!("{} = {}", key, format_value(value, &path)?));
    }
    Ok(lines)
}

/// One header block per map entry of `map`, depth first
fn write_tables(
    blocks: &mut Vec<Vec<String>>,
    map: &ConfigMap,
    path: &str,
) -> Result<(), SerializeError> {
    for (key, value) in map {
        let Some(table) = value.as_map() else {
            continue;
        };
        let path = child_path(path, key);
        check_key(key, &path)?;

        let mut block = vec![format!("[{}]", path)];
        block.extend(write_assignments(table, &path)?);
        blocks.push(block);

        write_tables(blocks, table, &path)?;
    }
    Ok(())
}

fn check_key(key: &str, path: &str) -> Result<(), SerializeError> {
    if bare_key_pattern().is_match(key) {
        Ok(())
    } else {
        Err(unrepresentable(
            Format::Toml,
            path,
            format!("'{}' is not a bare key", key),
        ))
    }
}

fn format_value(value: &ConfigValue, path: &str) -> Result<String, SerializeError> {
    Ok(match value {
        ConfigValue::Null => "\"\"".to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Int(i) => i.to_string(),
        ConfigValue::Float(f) => format_float(*f, Format::Toml, path)?,
        ConfigValue::DateTime(dt) => format_datetime(dt),
        ConfigValue::String(s) if is_iso_utc_datetime(s) => s.clone(),
        ConfigValue::String(s) => quote(s),
        ConfigValue::Array(items) => {
            let parts = items
                .iter()
                .enumerate()
                .map(|(i, item)| format_value(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            format!("[{}]", parts.join(", "))
        }
        ConfigValue::Map(_) => {
            return Err(unrepresentable(
                Format::Toml,
                path,
                "tables inside arrays are not supported",
            ))
        }
    })
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
