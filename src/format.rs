//! File format dispatch
//!
//! Maps file extensions to the parser and serializer of each supported
//! format.

use crate::models::ConfigValue;
use crate::parsers::{FormatParser, IniParser, JsonParser, ParseError, TomlParser, YamlParser};
use crate::writers::{FormatWriter, IniWriter, JsonWriter, SerializeError, TomlWriter, YamlWriter};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A supported configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Ini,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Yaml, Format::Toml, Format::Ini];

    /// Resolve a file extension (with or without the leading dot),
    /// case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "ini" => Some(Format::Ini),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Upper-case display name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
            Format::Ini => "INI",
        }
    }

    /// Canonical file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Ini => "ini",
        }
    }

    pub fn parser(self) -> &'static dyn FormatParser {
        match self {
            Format::Json => &JsonParser,
            Format::Yaml => &YamlParser,
            Format::Toml => &TomlParser,
            Format::Ini => &IniParser,
        }
    }

    pub fn writer(self) -> &'static dyn FormatWriter {
        match self {
            Format::Json => &JsonWriter,
            Format::Yaml => &YamlWriter,
            Format::Toml => &TomlWriter,
            Format::Ini => &IniWriter,
        }
    }

    pub fn parse(self, text: &str) -> Result<ConfigValue, ParseError> {
        self.parser().parse(text)
    }

    pub fn serialize(self, value: &ConfigValue) -> Result<String, SerializeError> {
        self.writer().serialize(value)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
