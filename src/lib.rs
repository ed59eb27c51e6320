//! polyconf - multi-format configuration loading and validation
//!
//! polyconf reads JSON, YAML, TOML and INI documents into one
//! format-agnostic [`ConfigValue`] tree, validates the tree against a
//! declarative [`Schema`], fills in schema defaults and writes the tree back
//! out in any of the four formats.

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod writers;

mod regex_util;

pub use config::{
    fill_defaults, load_config, load_schema, mask_secrets, save_config, validate, ConfigManager,
    ConfigValidator, ValidationError, DEFAULT_MASK,
};
pub use format::Format;
pub use models::*;
pub use parsers::{
    parse_ini, parse_json, parse_toml, parse_yaml, FormatParser, IniParser, JsonParser, ParseError,
    TomlParser, YamlParser,
};
pub use writers::{
    serialize_ini, serialize_json, serialize_toml, serialize_yaml, FormatWriter, SerializeError,
};

use std::path::PathBuf;

/// Result type alias for polyconf operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to polyconf operations
#[derive(thiserror::Error, Debug)]
pub enum PolyconfError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },
}
