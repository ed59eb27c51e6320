//! Unit tests for schema validation, default filling and secret masking
//!
//! Schemas are written as JSON documents and loaded through
//! `Schema::from_value`, the same path a schema file takes.

use polyconf::{
    fill_defaults, mask_secrets, parse_json, validate, ConfigValidator, ConfigValue, Schema,
    ValidationError, DEFAULT_MASK,
};

fn schema(document: &str) -> Schema {
    Schema::from_value(&parse_json(document).unwrap()).unwrap()
}

fn config(document: &str) -> ConfigValue {
    parse_json(document).unwrap()
}

fn db_schema() -> Schema {
    schema(
        r#"{
            "db": {
                "type": "dict",
                "required": true,
                "schema": {
                    "host": {"type": "str", "required": true},
                    "port": {"type": "int", "required": true}
                }
            }
        }"#,
    )
}

// ====== VALIDATION ======

#[test]
fn test_valid_simple_dict() {
    let schema = schema(
        r#"{"name": {"type": "str", "required": true}, "age": {"type": "int", "required": true}}"#,
    );
    let validator = ConfigValidator::new(&schema);
    assert!(validator.validate(&config(r#"{"name": "Alice", "age": 30}"#)).is_ok());
}

#[test]
fn test_missing_required_key() {
    let schema = schema(
        r#"{"name": {"type": "str", "required": true}, "age": {"type": "int", "required": true}}"#,
    );
    let err = validate(&config(r#"{"name": "Bob"}"#), &schema).unwrap_err();
    assert_eq!(err, ValidationError::MissingRequiredField { path: "age".into() });
    assert_eq!(err.to_string(), "Missing required key: age");
}

#[test]
fn test_wrong_type() {
    let schema = schema(r#"{"enabled": {"type": "bool", "required": true}}"#);
    let err = validate(&config(r#"{"enabled": "true"}"#), &schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Incorrect type for key enabled: expected bool, got str"
    );
}

#[test]
fn test_nested_dict_valid() {
    let value = config(r#"{"db": {"host": "localhost", "port": 5432}}"#);
    assert!(validate(&value, &db_schema()).is_ok());
}

#[test]
fn test_nested_dict_missing_field() {
    let err = validate(&config(r#"{"db": {"host": "localhost"}}"#), &db_schema()).unwrap_err();
    assert_eq!(err.path(), "db.port");
    assert_eq!(err.to_string(), "Missing required key: db.port");
}

#[test]
fn test_nested_extra_field() {
    let value = config(r#"{"db": {"host": "localhost", "port": 5432, "pool": 4}}"#);
    let err = validate(&value, &db_schema()).unwrap_err();
    assert_eq!(err, ValidationError::ExtraField { path: "db.pool".into() });
}

#[test]
fn test_list_of_strings_valid() {
    let schema = schema(r#"{"users": {"type": "list", "required": true, "items": {"type": "str"}}}"#);
    assert!(validate(&config(r#"{"users": ["alice", "bob", "carol"]}"#), &schema).is_ok());
}

#[test]
fn test_list_wrong_item_type() {
    let schema = schema(r#"{"scores": {"type": "list", "required": true, "items": {"type": "int"}}}"#);
    let err = validate(&config(r#"{"scores": [10, "twenty", 30]}"#), &schema).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidListItemType { .. }));
    assert_eq!(
        err.to_string(),
        "Incorrect type for key scores[1]: expected int, got str"
    );
}

#[test]
fn test_date_valid() {
    let schema = schema(r#"{"created_at": {"type": "str", "required": true, "format": "date"}}"#);
    assert!(validate(&config(r#"{"created_at": "2024-12-31T12:00:00Z"}"#), &schema).is_ok());
}

#[test]
fn test_date_invalid() {
    let schema = schema(r#"{"created_at": {"type": "str", "required": true, "format": "date"}}"#);
    let err = validate(&config(r#"{"created_at": "31-12-2024"}"#), &schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Incorrect date format for key created_at: expected YYYY-MM-DDTHH:MM:SSZ"
    );
}

#[test]
fn test_schema_document_errors() {
    let bad = parse_json(r#"{"port": {"type": "number"}}"#).unwrap();
    assert!(Schema::from_value(&bad).is_err());

    let bad = parse_json(r#"{"port": {"type": "int", "min": 1}}"#).unwrap();
    assert!(Schema::from_value(&bad).is_err());
}

// ====== DEFAULTS ======

#[test]
fn test_fill_defaults_simple() {
    let schema = schema(r#"{"host": {"type": "str"}, "port": {"type": "int", "default": 8080}}"#);
    let result = fill_defaults(&config(r#"{"host": "localhost"}"#), &schema);
    assert_eq!(result, config(r#"{"host": "localhost", "port": 8080}"#));
}

#[test]
fn test_fill_defaults_nested() {
    let schema = schema(
        r#"{"db": {"type": "dict", "schema": {
            "user": {"type": "str"},
            "password": {"type": "str", "default": "secret"}
        }}}"#,
    );
    let result = fill_defaults(&config(r#"{"db": {"user": "admin"}}"#), &schema);
    assert_eq!(result, config(r#"{"db": {"user": "admin", "password": "secret"}}"#));
}

#[test]
fn test_fill_defaults_empty_config() {
    let schema = schema(
        r#"{
            "debug": {"type": "bool", "default": false},
            "logging": {"type": "dict", "schema": {"level": {"type": "str", "default": "INFO"}}}
        }"#,
    );
    let result = fill_defaults(&ConfigValue::empty_map(), &schema);
    assert_eq!(result, config(r#"{"debug": false, "logging": {"level": "INFO"}}"#));
}

#[test]
fn test_fill_defaults_preserves_existing_values() {
    let schema = schema(
        r#"{
            "debug": {"type": "bool", "default": false},
            "logging": {"type": "dict", "schema": {
                "level": {"type": "str", "default": "INFO"},
                "format": {"type": "str", "default": "%(message)s"}
            }}
        }"#,
    );
    let result = fill_defaults(&config(r#"{"debug": true, "logging": {"level": "DEBUG"}}"#), &schema);
    assert_eq!(
        result,
        config(r#"{"debug": true, "logging": {"level": "DEBUG", "format": "%(message)s"}}"#)
    );
}

#[test]
fn test_fill_defaults_applies_default_to_empty_string() {
    let schema = schema(r#"{"port": {"type": "int", "default": 1234}}"#);
    let result = fill_defaults(&config(r#"{"port": ""}"#), &schema);
    assert_eq!(result, config(r#"{"port": 1234}"#));
}

#[test]
fn test_fill_defaults_is_idempotent() {
    let schema = schema(
        r#"{"logging": {"type": "dict", "schema": {"level": {"type": "str", "default": "INFO"}}}}"#,
    );
    let once = fill_defaults(&ConfigValue::empty_map(), &schema);
    assert_eq!(fill_defaults(&once, &schema), once);
}

// ====== MASKING ======

#[test]
fn test_mask_secrets_flat_config() {
    let result = mask_secrets(
        &config(r#"{"username": "admin", "password": "1234"}"#),
        &["password"],
        DEFAULT_MASK,
    );
    assert_eq!(result, config(r#"{"username": "admin", "password": "***"}"#));
}

#[test]
fn test_mask_secrets_nested() {
    let value = config(r#"{"db": {"user": "admin", "password": "1234"}, "api_key": "ABC123"}"#);
    let result = mask_secrets(&value, &["db.password", "api_key"], DEFAULT_MASK);
    assert_eq!(
        result,
        config(r#"{"db": {"user": "admin", "password": "***"}, "api_key": "***"}"#)
    );
}

#[test]
fn test_mask_secrets_missing_fields() {
    let value = config(r#"{"username": "admin"}"#);
    assert_eq!(mask_secrets(&value, &["password", "token"], DEFAULT_MASK), value);
}

#[test]
fn test_mask_secrets_custom_mask() {
    let result = mask_secrets(&config(r#"{"secret": "topsecret"}"#), &["secret"], "XXX");
    assert_eq!(result, config(r#"{"secret": "XXX"}"#));
}
