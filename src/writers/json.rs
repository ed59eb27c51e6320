//! JSON serializer with two-space indentation

use super::{child_path, format_datetime, format_float, root_map, FormatWriter, SerializeError};
use crate::format::Format;
use crate::models::ConfigValue;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl FormatWriter for JsonWriter {
    fn serialize(&self, value: &ConfigValue) -> Result<String, SerializeError> {
        serialize_json(value)
    }
}

pub fn serialize_json(value: &ConfigValue) -> Result<String, SerializeError> {
    root_map(value, Format::Json)?;
    let mut out = String::new();
    write_value(&mut out, value, 0, "")?;
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &ConfigValue,
    level: usize,
    path: &str,
) -> Result<(), SerializeError> {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConfigValue::Int(i) => out.push_str(&i.to_string()),
        ConfigValue::Float(f) => out.push_str(&format_float(*f, Format::Json, path)?),
        ConfigValue::String(s) => write_string(out, s),
        ConfigValue::DateTime(dt) => write_string(out, &format_datetime(dt)),
        ConfigValue::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return Ok(());
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                push_indent(out, level + 1);
                write_value(out, item, level + 1, &format!("{}[{}]", path, i))?;
            }
            out.push('\n');
            push_indent(out, level);
            out.push(']');
        }
        ConfigValue::Map(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return Ok(());
            }
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                push_indent(out, level + 1);
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item, level + 1, &child_path(path, key))?;
            }
            out.push('\n');
            push_indent(out, level);
            out.push('}');
        }
    }
    Ok(())
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
