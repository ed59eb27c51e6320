//! Declarative schema model
//!
//! A [`Schema`] maps field names to [`FieldRule`]s. Schemas are built once
//! (in code through the builder methods, or from a schema document through
//! [`Schema::from_value`]) and are read-only afterwards.

use crate::models::value::{ConfigMap, ConfigValue};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid schema at '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

impl SchemaError {
    fn invalid(path: &str, reason: impl Into<String>) -> Self {
        SchemaError::Invalid {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
    Map,
    List,
    /// ISO-8601 `YYYY-MM-DDTHH:MM:SSZ` string
    Date,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Map => "map",
            FieldType::List => "list",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "str" | "string" => Ok(FieldType::Str),
            "int" | "integer" => Ok(FieldType::Int),
            "float" => Ok(FieldType::Float),
            "bool" | "boolean" => Ok(FieldType::Bool),
            "map" | "dict" => Ok(FieldType::Map),
            "list" | "array" => Ok(FieldType::List),
            "date" => Ok(FieldType::Date),
            _ => Err(format!("Unknown field type: {}", s)),
        }
    }
}

/// Extra format constraint on a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Date,
}

/// Rules for one schema field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<ConfigValue>,
    /// Nested schema for `Map` fields
    pub schema: Option<Schema>,
    /// Element type for `List` fields
    pub items: Option<FieldType>,
    pub format: Option<FieldFormat>,
}

impl FieldRule {
    /// An optional field of the given type with no default
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            schema: None,
            items: None,
            format: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<ConfigValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_items(mut self, items: FieldType) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Whether values of this field must satisfy the date rule
    pub fn is_date(&self) -> bool {
        self.field_type == FieldType::Date
            || (self.field_type == FieldType::Str && self.format == Some(FieldFormat::Date))
    }
}

/// Ordered set of field rules
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier rule of the same name
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a schema from a parsed schema document.
    ///
    /// Each field is a map with `type`, and optionally `required`, `default`,
    /// `schema`, `items` (a map with `type`), `item_type` and `format`.
    pub fn from_value(value: &ConfigValue) -> Result<Self, SchemaError> {
        let map = value
            .as_map()
            .ok_or_else(|| SchemaError::invalid("<root>", "schema must be a map"))?;
        Self::from_map(map, "")
    }

    fn from_map(map: &ConfigMap, parent: &str) -> Result<Self, SchemaError> {
        let mut schema = Schema::new();
        for (name, entry) in map {
            let path = if parent.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", parent, name)
            };
            let rule = Self::rule_from_value(entry, &path)?;
            schema.fields.insert(name.clone(), rule);
        }
        Ok(schema)
    }

    fn rule_from_value(entry: &ConfigValue, path: &str) -> Result<FieldRule, SchemaError> {
        let attrs = entry
            .as_map()
            .ok_or_else(|| SchemaError::invalid(path, "field rule must be a map"))?;

        let type_name = attrs
            .get("type")
            .ok_or_else(|| SchemaError::invalid(path, "missing 'type'"))?
            .as_str()
            .ok_or_else(|| SchemaError::invalid(path, "'type' must be a string"))?;
        let mut rule = FieldRule::new(parse_type(type_name, path)?);

        for (attr, value) in attrs {
            match attr.as_str() {
                "type" => {}
                "required" => {
                    rule.required = value
                        .as_bool()
                        .ok_or_else(|| SchemaError::invalid(path, "'required' must be a bool"))?;
                }
                "default" => rule.default = Some(value.clone()),
                "schema" => {
                    let nested = value
                        .as_map()
                        .ok_or_else(|| SchemaError::invalid(path, "'schema' must be a map"))?;
                    rule.schema = Some(Self::from_map(nested, path)?);
                }
                "items" => {
                    let item_type = value
                        .get("type")
                        .and_then(ConfigValue::as_str)
                        .ok_or_else(|| {
                            SchemaError::invalid(path, "'items' must be a map with a 'type'")
                        })?;
                    rule.items = Some(parse_type(item_type, path)?);
                }
                "item_type" => {
                    let item_type = value
                        .as_str()
                        .ok_or_else(|| SchemaError::invalid(path, "'item_type' must be a string"))?;
                    rule.items = Some(parse_type(item_type, path)?);
                }
                "format" => match value.as_str() {
                    Some("date") => rule.format = Some(FieldFormat::Date),
                    _ => return Err(SchemaError::invalid(path, "unsupported 'format'")),
                },
                other => {
                    return Err(SchemaError::invalid(
                        path,
                        format!("unknown rule attribute '{}'", other),
                    ))
                }
            }
        }

        Ok(rule)
    }
}

fn parse_type(name: &str, path: &str) -> Result<FieldType, SchemaError> {
    FieldType::from_str(name).map_err(|e| SchemaError::invalid(path, e))
}

/// Built-in schema used when a caller does not supply one
pub fn default_schema() -> &'static Schema {
    static DEFAULT_SCHEMA: OnceLock<Schema> = OnceLock::new();
    DEFAULT_SCHEMA.get_or_init(|| {
        Schema::new()
            .field(
                "database",
                FieldRule::new(FieldType::Map).required().with_schema(
                    Schema::new()
                        .field("host", FieldRule::new(FieldType::Str).required())
                        .field("port", FieldRule::new(FieldType::Int).required())
                        .field("user", FieldRule::new(FieldType::Str).required())
                        .field("password", FieldRule::new(FieldType::Str).required()),
                ),
            )
            .field(
                "logging",
                FieldRule::new(FieldType::Map).with_schema(
                    Schema::new()
                        .field("level", FieldRule::new(FieldType::Str).required())
                        .field("output", FieldRule::new(FieldType::Str).required())
                        .field(
                            "rotation_interval",
                            FieldRule::new(FieldType::Int).with_default(7),
                        ),
                ),
            )
            .field(
                "network",
                FieldRule::new(FieldType::Map).with_schema(
                    Schema::new()
                        .field("timeout", FieldRule::new(FieldType::Int).with_default(30))
                        .field("retries", FieldRule::new(FieldType::Int).with_default(3)),
                ),
            )
            .field("date_of_creation", FieldRule::new(FieldType::Date).required())
            .field(
                "users",
                FieldRule::new(FieldType::List)
                    .required()
                    .with_items(FieldType::Str),
            )
    })
}
