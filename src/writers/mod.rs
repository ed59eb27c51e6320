//! Serializers for the four supported formats
//!
//! Every writer accepts only a map at the root and renders a value tree to
//! text its own parser reads back.

pub mod ini;
pub mod json;
pub mod toml;
pub mod yaml;

pub use self::ini::{serialize_ini, IniWriter};
pub use self::json::{serialize_json, JsonWriter};
pub use self::toml::{serialize_toml, TomlWriter};
pub use self::yaml::{serialize_yaml, YamlWriter};

use crate::format::Format;
use crate::models::{ConfigMap, ConfigValue};
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("{format} config must be a dictionary")]
    WrongRootType { format: Format },

    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("{format} cannot represent the value at '{path}': {reason}")]
    Unrepresentable {
        format: Format,
        path: String,
        reason: String,
    },
}

/// Common contract of every format serializer
pub trait FormatWriter {
    fn serialize(&self, value: &ConfigValue) -> Result<String, SerializeError>;
}

/// Return the root map or fail with the format's root type error
pub(crate) fn root_map(value: &ConfigValue, format: Format) -> Result<&ConfigMap, SerializeError> {
    value
        .as_map()
        .ok_or(SerializeError::WrongRootType { format })
}

pub(crate) fn unrepresentable(
    format: Format,
    path: &str,
    reason: impl Into<String>,
) -> SerializeError {
    SerializeError::Unrepresentable {
        format,
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Render a float so it always reads back as a float (`1.0`, `1e20`).
/// Non-finite values have no textual form in any supported format.
pub(crate) fn format_float(value: f64, format: Format, path: &str) -> Result<String, SerializeError> {
    if !value.is_finite() {
        return Err(unrepresentable(format, path, "non-finite float"));
    }
    Ok(format!("{:?}", value))
}

pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
