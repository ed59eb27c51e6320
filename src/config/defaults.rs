//! Schema default filling and secret masking
//!
//! Both transforms are pure: they return a new tree and leave the input
//! untouched.

use crate::models::{ConfigMap, ConfigValue, FieldType, Schema};
use tracing::trace;

/// Replacement text used by [`mask_secrets`] when no other mask is given
pub const DEFAULT_MASK: &str = "***";

/// Return a copy of `value` with schema defaults applied.
///
/// A missing field takes its default; a missing map field without a default
/// becomes an empty map filled from its nested schema. A present `null` or
/// empty-string value is replaced when the field has a default. Keys the
/// schema does not mention are kept. Non-map input is returned unchanged.
pub fn fill_defaults(value: &ConfigValue, schema: &Schema) -> ConfigValue {
    match value.as_map() {
        Some(map) => ConfigValue::Map(fill_map(map, schema)),
        None => value.clone(),
    }
}

fn fill_map(map: &ConfigMap, schema: &Schema) -> ConfigMap {
    let mut filled = map.clone();

    for (name, rule) in schema.iter() {
        match filled.get_mut(name) {
            None => {
                if let Some(default) = &rule.default {
                    trace!(field = name, "applying default");
                    filled.insert(name.to_string(), default.clone());
                } else if rule.field_type == FieldType::Map {
                    let nested = match &rule.schema {
                        Some(nested_schema) => fill_map(&ConfigMap::new(), nested_schema),
                        None => ConfigMap::new(),
                    };
                    filled.insert(name.to_string(), ConfigValue::Map(nested));
                }
            }
            Some(current) => {
                let blank = current.is_null() || current.as_str() == Some("");
                match (&rule.default, &rule.schema, current) {
                    (Some(default), _, current) if blank => *current = default.clone(),
                    (_, Some(nested_schema), ConfigValue::Map(nested))
                        if rule.field_type == FieldType::Map =>
                    {
                        *nested = fill_map(nested, nested_schema);
                    }
                    _ => {}
                }
            }
        }
    }

    filled
}

/// Return a copy of `value` where every non-map leaf whose dotted path is
/// listed in `secret_fields` is replaced by `mask`. Paths that do not exist
/// are ignored.
pub fn mask_secrets<S: AsRef<str>>(
    value: &ConfigValue,
    secret_fields: &[S],
    mask: &str,
) -> ConfigValue {
    mask_node(value, "", secret_fields, mask)
}

fn mask_node<S: AsRef<str>>(
    value: &ConfigValue,
    path: &str,
    secret_fields: &[S],
    mask: &str,
) -> ConfigValue {
    match value {
        ConfigValue::Map(map) => ConfigValue::Map(
            map.iter()
                .map(|(key, child)| {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    (key.clone(), mask_node(child, &child_path, secret_fields, mask))
                })
                .collect(),
        ),
        _ if secret_fields.iter().any(|field| field.as_ref() == path) => {
            ConfigValue::String(mask.to_string())
        }
        leaf => leaf.clone(),
    }
}
