//! INI serializer

use super::{
    child_path, format_datetime, format_float, root_map, unrepresentable, FormatWriter,
    SerializeError,
};
use crate::format::Format;
use crate::models::{ConfigMap, ConfigValue};

#[derive(Debug, Clone, Copy, Default)]
pub struct IniWriter;

impl FormatWriter for IniWriter {
    fn serialize(&self, value: &ConfigValue) -> Result<String, SerializeError> {
        serialize_ini(value)
    }
}

pub fn serialize_ini(value: &ConfigValue) -> Result<String, SerializeError> {
    let root = root_map(value, Format::Ini)?;
    let mut blocks: Vec<Vec<String>> = Vec::new();

    let root_lines = write_assignments(root, "")?;
    if !root_lines.is_empty() {
        blocks.push(root_lines);
    }
    write_sections(&mut blocks, root, "")?;

    Ok(blocks
        .iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn write_assignments(map: &ConfigMap, path: &str) -> Result<Vec<String>, SerializeError> {
    map.iter()
        .filter(|(_, value)| !value.is_map())
        .map(|(key, value)| {
            let value = format_value(value, &child_path(path, key))?;
            Ok(format!("{} = {}", key, value))
        })
        .collect()
}

fn write_sections(
    blocks: &mut Vec<Vec<String>>,
    map: &ConfigMap,
    path: &str,
) -> Result<(), SerializeError> {
    for (key, value) in map {
        if let ConfigValue::Map(section) = value {
            let path = child_path(path, key);
            let mut block = vec![format!("[{}]", path)];
            block.extend(write_assignments(section, &path)?);
            blocks.push(block);
            write_sections(blocks, section, &path)?;
        }
    }
    Ok(())
}

fn format_value(value: &ConfigValue, path: &str) -> Result<String, SerializeError> {
    match value {
        ConfigValue::Array(items) => {
            let parts = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = format!("{}[{}]", path, i);
                    match item {
                        ConfigValue::Array(_) | ConfigValue::Map(_) => Err(unrepresentable(
                            Format::Ini,
                            &item_path,
                            "lists may only hold scalars",
                        )),
                        scalar => format_scalar(scalar, &item_path),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(", "))
        }
        scalar => format_scalar(scalar, path),
    }
}

fn format_scalar(value: &ConfigValue, path: &str) -> Result<String, SerializeError> {
    Ok(match value {
        ConfigValue::Null => "null".to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Int(i) => i.to_string(),
        ConfigValue::Float(f) => format_float(*f, Format::Ini, path)?,
        ConfigValue::DateTime(dt) => format_datetime(dt),
        ConfigValue::String(s) => s.clone(),
        ConfigValue::Array(_) | ConfigValue::Map(_) => {
            return Err(unrepresentable(Format::Ini, path, "expected a scalar"))
        }
    })
}
