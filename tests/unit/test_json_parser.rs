//! Unit tests for the JSON parser
//!
//! Valid documents across every value kind, then each syntax error the
//! parser reports.

use polyconf::{parse_json, ConfigValue, Format, ParseError};

fn map(entries: Vec<(&str, ConfigValue)>) -> ConfigValue {
    entries.into_iter().collect()
}

fn list(items: Vec<ConfigValue>) -> ConfigValue {
    ConfigValue::Array(items)
}

fn parse_err(text: &str) -> ParseError {
    parse_json(text).expect_err("document should be rejected")
}

fn assert_error_contains(text: &str, fragment: &str) {
    let err = parse_err(text);
    assert!(
        err.message().contains(fragment),
        "expected {:?} in error for {:?}, got {:?}",
        fragment,
        text,
        err.message()
    );
}

// ====== VALID DOCUMENTS ======

#[test]
fn test_empty_documents() {
    assert_eq!(parse_json("").unwrap(), ConfigValue::empty_map());
    assert_eq!(parse_json("{}").unwrap(), ConfigValue::empty_map());
    assert_eq!(parse_json("[]").unwrap(), list(vec![]));
}

#[test]
fn test_simple_object() {
    assert_eq!(
        parse_json(r#"{"key": "value"}"#).unwrap(),
        map(vec![("key", "value".into())])
    );
}

#[test]
fn test_arrays() {
    assert_eq!(
        parse_json("[1, 2, 3]").unwrap(),
        list(vec![1.into(), 2.into(), 3.into()])
    );
    assert_eq!(
        parse_json("[ \n1,\t2,\r3 \n]").unwrap(),
        list(vec![1.into(), 2.into(), 3.into()])
    );
    assert_eq!(
        parse_json(r#"[1, "text", null, true, false]"#).unwrap(),
        list(vec![
            1.into(),
            "text".into(),
            ConfigValue::Null,
            true.into(),
            false.into()
        ])
    );
}

#[test]
fn test_escaped_string_characters() {
    let cases = [
        (r#""He said: \"Hi!\"""#, "He said: \"Hi!\""),
        (
            r#""string with \"quotes\" and \\backslash""#,
            "string with \"quotes\" and \\backslash",
        ),
        (r#""C:\\\\path\\\\to""#, r"C:\\path\\to"),
        (r#""https:\/\/example.com""#, "https://example.com"),
        (r#""a\b""#, "a\u{0008}"),
        (r#""a\f""#, "a\u{000C}"),
        (r#""line1\nline2""#, "line1\nline2"),
        (r#""a\rb""#, "a\rb"),
        (r#""a\tb""#, "a\tb"),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_json(input).unwrap(), ConfigValue::from(expected), "{}", input);
    }
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(
        parse_json(r#""\u041f\u0440\u0438\u0432\u0456\u0442""#).unwrap(),
        ConfigValue::from("Привіт")
    );
    assert_eq!(
        parse_json(r#""\u00F6\u00E4\u00FC""#).unwrap(),
        ConfigValue::from("öäü")
    );
}

#[test]
fn test_integers() {
    for (input, expected) in [
        ("123", 123),
        ("-468", -468),
        ("999999999", 999_999_999),
        ("0", 0),
        ("-2147483648", -2_147_483_648),
    ] {
        assert_eq!(parse_json(input).unwrap(), ConfigValue::Int(expected));
    }
}

#[test]
fn test_floats_and_exponents() {
    for (input, expected) in [
        ("-15.96", -15.96),
        ("0.0", 0.0),
        ("123.456", 123.456),
        ("1e10", 1e10),
        ("2.5E-5", 2.5e-5),
        ("-3.25e+2", -325.0),
        ("5E-1", 0.5),
    ] {
        assert_eq!(parse_json(input).unwrap(), ConfigValue::Float(expected), "{}", input);
    }
}

#[test]
fn test_deeply_nested_structures() {
    let value = parse_json(r#"{"a": {"b": {"c": {"d": {"e": {"f": {"g": 42}}}}}}}"#).unwrap();
    assert_eq!(value.get_path("a.b.c.d.e.f.g"), Some(&ConfigValue::Int(42)));
}

#[test]
fn test_array_of_objects() {
    let value = parse_json(
        r#"
    [
        {"id": 1},
        {"id": 2},
        {"id": 3}
    ]
    "#,
    )
    .unwrap();
    assert_eq!(
        value,
        list(vec![
            map(vec![("id", 1.into())]),
            map(vec![("id", 2.into())]),
            map(vec![("id", 3.into())]),
        ])
    );
}

#[test]
fn test_complex_nested_structure() {
    let value = parse_json(
        r#"
    {
        "users": [
            {"id": 1, "name": "Alice", "preferences": {"theme": "dark", "notifications": true}},
            {"id": 2, "name": "Bob", "preferences": {"theme": "light", "notifications": false}}
        ],
        "settings": {"version": "1.2.3", "features": [1, 2, 3], "active": true}
    }
    "#,
    )
    .unwrap();

    let users = value.get("users").and_then(ConfigValue::as_array).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].get("name"), Some(&ConfigValue::from("Alice")));
    assert_eq!(
        users[1].get_path("preferences.theme"),
        Some(&ConfigValue::from("light"))
    );
    assert_eq!(
        value.get_path("settings.features"),
        Some(&list(vec![1.into(), 2.into(), 3.into()]))
    );
}

#[test]
fn test_key_order_is_preserved() {
    let value = parse_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_line_number_reporting() {
    let err = parse_err("{\n\"a\": 1,\n\"b\": \n[2,3,4}}");
    assert_eq!(err.line(), 3);
    assert!(err.to_string().contains("line 3"));
    assert_eq!(err.format(), Format::Json);
}

// ====== INVALID DOCUMENTS ======

#[test]
fn test_string_errors() {
    assert_error_contains(
        r#"{"key": value"}"#,
        "Expected value. Possibly missing quotes for string.",
    );
    assert_error_contains(r#"{"key": "value}"#, "Unterminated string");
    assert_error_contains(
        r#"{"key": "value", d"another": 2}"#,
        "Expected string key in double quotes",
    );
}

#[test]
fn test_number_errors() {
    for input in ["+-1", "1e", "0123", "1.2.3"] {
        assert_error_contains(input, "Invalid number");
    }
    for input in ["12.", "-12.", ".16", "-.16"] {
        assert_error_contains(input, "Invalid float number format");
    }
}

#[test]
fn test_array_errors() {
    assert_error_contains("[1, 2, 3", "Invalid JSON array");
    assert_error_contains("[1; 2]", "Expected ',' or ']' or quotes after value");
    assert_error_contains(r#"{"numbers": [1, 2, 3}"#, "No matching closing brace for '['");
}

#[test]
fn test_object_errors() {
    assert_error_contains(r#"{"key": "value""#, "Invalid JSON object");
    assert_error_contains(r#"{"a": 1; "b": 2}"#, "Expected ',' or '}' or quotes after value");
    assert_error_contains(r#"{key": "value"}"#, "Expected string key in double quotes");
    assert_error_contains(r#"{"key: "value"}"#, "Expected ':' or quotes after key");
    assert_error_contains(r#"{"key" "value"}"#, "Expected ':' or quotes after key");
    assert_error_contains(
        r#"{"key": "value" "another": 2}"#,
        "Expected ',' or '}' or quotes after value",
    );
}

#[test]
fn test_escape_errors() {
    assert_error_contains(r#""bad\escape""#, "Invalid escape character");
    assert_error_contains(r#""\u12""#, "Incomplete unicode escape sequence");
    assert_error_contains(r#""\uZZZZ""#, "Invalid unicode escape");
}

#[test]
fn test_error_display_names_format_and_line() {
    let err = parse_err("[1, 2,]");
    assert_eq!(
        err.to_string(),
        "JSON syntax error on line 1: Trailing comma in JSON array"
    );
}
