//! Loading and saving configuration files
//!
//! The format is chosen from the file extension. Saves serialize in full
//! before touching the disk and then replace the target atomically through a
//! sibling temporary file.

use crate::format::Format;
use crate::models::{ConfigValue, Schema};
use crate::writers::SerializeError;
use crate::PolyconfError;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument, warn};

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PolyconfError + '_ {
    move |source| PolyconfError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read and parse a configuration file
#[instrument(level = "debug")]
pub fn load_config(path: &Path) -> Result<ConfigValue, PolyconfError> {
    let format = Format::from_path(path).ok_or_else(|| PolyconfError::UnsupportedFormat {
        extension: extension_of(path),
    })?;

    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let value = format.parse(&text)?;

    debug!(format = %format, bytes = text.len(), "loaded configuration");
    Ok(value)
}

/// Serialize `value` in the format named by the extension of `path` and
/// write it atomically.
#[instrument(level = "debug", skip(value))]
pub fn save_config(value: &ConfigValue, path: &Path) -> Result<(), PolyconfError> {
    let format = Format::from_path(path).ok_or_else(|| SerializeError::UnsupportedFormat {
        extension: extension_of(path),
    })?;
    let content = format.serialize(value)?;

    let temp_path = path.with_extension(format!("{}.tmp", format.extension()));
    fs::write(&temp_path, &content).map_err(io_error(&temp_path))?;
    if let Err(source) = fs::rename(&temp_path, path) {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temporary file");
        }
        return Err(io_error(path)(source));
    }

    debug!(format = %format, bytes = content.len(), "saved configuration");
    Ok(())
}

/// Load a schema document written in any supported format
#[instrument(level = "debug")]
pub fn load_schema(path: &Path) -> Result<Schema, PolyconfError> {
    let document = load_config(path)?;
    let schema = Schema::from_value(&document)?;
    debug!(fields = schema.len(), "loaded schema");
    Ok(schema)
}
