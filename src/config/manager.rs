//! High-level configuration handle
//!
//! [`ConfigManager`] bundles a loaded configuration with the schema it is
//! checked against.

use crate::config::defaults::{fill_defaults, mask_secrets, DEFAULT_MASK};
use crate::config::persistence::{load_config, save_config};
use crate::config::validator::{ConfigValidator, ValidationError};
use crate::format::Format;
use crate::models::{default_schema, ConfigValue, Schema};
use crate::writers::SerializeError;
use crate::PolyconfError;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ConfigValue,
    schema: Schema,
}

impl ConfigManager {
    /// Load `path`, checking it against `schema` or the built-in default
    /// schema when none is given. The document is not validated here.
    #[instrument(level = "debug", skip(schema))]
    pub fn load(path: &Path, schema: Option<Schema>) -> Result<Self, PolyconfError> {
        let config = load_config(path)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(Self::from_value(config, schema))
    }

    pub fn from_value(config: ConfigValue, schema: Option<Schema>) -> Self {
        Self {
            config,
            schema: schema.unwrap_or_else(|| default_schema().clone()),
        }
    }

    pub fn config(&self) -> &ConfigValue {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ConfigValidator::new(&self.schema).validate(&self.config)
    }

    /// Replace the held configuration with its defaults-filled form
    pub fn apply_defaults(&mut self) -> &ConfigValue {
        self.config = fill_defaults(&self.config, &self.schema);
        &self.config
    }

    /// Copy of the configuration with the given dotted paths masked
    pub fn masked<S: AsRef<str>>(&self, secret_fields: &[S]) -> ConfigValue {
        mask_secrets(&self.config, secret_fields, DEFAULT_MASK)
    }

    pub fn render(&self, format: Format) -> Result<String, SerializeError> {
        format.serialize(&self.config)
    }

    pub fn save(&self, path: &Path) -> Result<(), PolyconfError> {
        save_config(&self.config, path)
    }
}
