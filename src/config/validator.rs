//! Schema validation of configuration trees
//!
//! Validation is fail-fast: the walk stops at the first violation and
//! reports it with the dotted path of the offending key. List elements are
//! addressed as `field[i]`.

use crate::models::{is_iso_utc_datetime, ConfigMap, ConfigValue, FieldRule, FieldType, Schema};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

const ROOT_PATH: &str = "<root>";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required key: {path}")]
    MissingRequiredField { path: String },

    #[error("Unexpected key: {path}")]
    ExtraField { path: String },

    #[error("Incorrect type for key {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Incorrect date format for key {path}: expected YYYY-MM-DDTHH:MM:SSZ")]
    InvalidDateFormat { path: String },

    #[error("Incorrect type for key {path}: expected {expected}, got {actual}")]
    InvalidListItemType {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl ValidationError {
    /// Dotted path of the key that failed
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField { path }
            | ValidationError::ExtraField { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::InvalidDateFormat { path }
            | ValidationError::InvalidListItemType { path, .. } => path,
        }
    }
}

/// Validator bound to one schema
#[derive(Debug, Clone, Copy)]
pub struct ConfigValidator<'s> {
    schema: &'s Schema,
}

impl<'s> ConfigValidator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Check `value` against the schema. The root must be a map.
    pub fn validate(&self, value: &ConfigValue) -> Result<(), ValidationError> {
        let map = value.as_map().ok_or_else(|| ValidationError::TypeMismatch {
            path: ROOT_PATH.to_string(),
            expected: FieldType::Map.name(),
            actual: value.type_name(),
        })?;

        validate_map(map, self.schema, "")?;
        debug!(fields = self.schema.len(), "configuration passed validation");
        Ok(())
    }
}

/// Check `value` against `schema`
pub fn validate(value: &ConfigValue, schema: &Schema) -> Result<(), ValidationError> {
    ConfigValidator::new(schema).validate(value)
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn validate_map(map: &ConfigMap, schema: &Schema, parent: &str) -> Result<(), ValidationError> {
    for (name, rule) in schema.iter() {
        let path = join(parent, name);
        match map.get(name) {
            Some(value) => validate_field(value, rule, &path)?,
            None if rule.required => {
                return Err(ValidationError::MissingRequiredField { path });
            }
            None => {}
        }
    }

    if let Some(extra) = map.keys().find(|key| !schema.contains(key)) {
        return Err(ValidationError::ExtraField {
            path: join(parent, extra),
        });
    }

    Ok(())
}

fn validate_field(value: &ConfigValue, rule: &FieldRule, path: &str) -> Result<(), ValidationError> {
    let mismatch = |expected: FieldType| ValidationError::TypeMismatch {
        path: path.to_string(),
        expected: expected.name(),
        actual: value.type_name(),
    };

    if rule.is_date() {
        return match check_date(value, path) {
            DateCheck::Valid => Ok(()),
            DateCheck::NotText => Err(mismatch(FieldType::Str)),
            DateCheck::Malformed => Err(ValidationError::InvalidDateFormat {
                path: path.to_string(),
            }),
        };
    }

    match rule.field_type {
        FieldType::Map => {
            let nested = value.as_map().ok_or_else(|| mismatch(FieldType::Map))?;
            if let Some(schema) = &rule.schema {
                validate_map(nested, schema, path)?;
            }
        }
        FieldType::List => {
            let items = value.as_array().ok_or_else(|| mismatch(FieldType::List))?;
            if let Some(item_type) = rule.items {
                for (i, item) in items.iter().enumerate() {
                    validate_item(item, item_type, &format!("{}[{}]", path, i))?;
                }
            }
        }
        expected => {
            if !is_kind(value, expected) {
                return Err(mismatch(expected));
            }
        }
    }

    Ok(())
}

fn validate_item(item: &ConfigValue, item_type: FieldType, path: &str) -> Result<(), ValidationError> {
    let mismatch = |expected: FieldType| ValidationError::InvalidListItemType {
        path: path.to_string(),
        expected: expected.name(),
        actual: item.type_name(),
    };

    if item_type == FieldType::Date {
        return match check_date(item, path) {
            DateCheck::Valid => Ok(()),
            DateCheck::NotText => Err(mismatch(FieldType::Str)),
            DateCheck::Malformed => Err(ValidationError::InvalidDateFormat {
                path: path.to_string(),
            }),
        };
    }

    if is_kind(item, item_type) {
        Ok(())
    } else {
        Err(mismatch(item_type))
    }
}

enum DateCheck {
    Valid,
    NotText,
    Malformed,
}

fn check_date(value: &ConfigValue, path: &str) -> DateCheck {
    match value {
        ConfigValue::DateTime(_) => DateCheck::Valid,
        ConfigValue::String(text)
            if is_iso_utc_datetime(text)
                && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ").is_ok() =>
        {
            DateCheck::Valid
        }
        ConfigValue::String(text) => {
            debug!(path, value = %text, "rejected date string");
            DateCheck::Malformed
        }
        _ => DateCheck::NotText,
    }
}

/// Exact kind equality; a bool is never a number and an int is not a float
fn is_kind(value: &ConfigValue, expected: FieldType) -> bool {
    matches!(
        (expected, value),
        (FieldType::Str, ConfigValue::String(_))
            | (FieldType::Int, ConfigValue::Int(_))
            | (FieldType::Float, ConfigValue::Float(_))
            | (FieldType::Bool, ConfigValue::Bool(_))
            | (FieldType::Map, ConfigValue::Map(_))
            | (FieldType::List, ConfigValue::Array(_))
    )
}
