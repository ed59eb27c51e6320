//! Format-agnostic configuration value model
//!
//! Every parser produces a [`ConfigValue`] tree and every serializer consumes
//! one. Maps keep insertion order and never hold duplicate keys.

use crate::regex_util::static_regex;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

static_regex!(fn iso_utc_pattern, r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$");

/// Whether `text` has the exact `YYYY-MM-DDTHH:MM:SSZ` shape. Only the shape
/// is checked; calendar validity is up to the caller.
pub fn is_iso_utc_datetime(text: &str) -> bool {
    iso_utc_pattern().is_match(text)
}

/// Ordered string-keyed map used for every mapping node
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A parsed configuration document or any node inside it
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Zone-less date or date-time recognised by the YAML parser
    DateTime(NaiveDateTime),
    Array(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    /// Create an empty map node
    pub fn empty_map() -> Self {
        ConfigValue::Map(ConfigMap::new())
    }

    /// Short type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "str",
            ConfigValue::DateTime(_) => "datetime",
            ConfigValue::Array(_) => "list",
            ConfigValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, ConfigValue::Map(_))
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key when this node is a map
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Follow a dotted path (`database.port`) through nested maps
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        path.split('.')
            .try_fold(self, |node, segment| node.get(segment))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<NaiveDateTime> for ConfigValue {
    fn from(value: NaiveDateTime) -> Self {
        ConfigValue::DateTime(value)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(values: Vec<T>) -> Self {
        ConfigValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
