//! Unit tests for the INI parser

use polyconf::{parse_ini, ConfigValue};

#[test]
fn test_empty_input() {
    assert_eq!(parse_ini("").unwrap(), ConfigValue::empty_map());
}

#[test]
fn test_comments_and_blank_lines() {
    let ini = "; comment line 1\n# comment line 2\n   \n";
    assert_eq!(parse_ini(ini).unwrap(), ConfigValue::empty_map());
}

#[test]
fn test_key_value_without_section() {
    let expected: ConfigValue = [("key", "value")].into_iter().collect();
    assert_eq!(parse_ini("key=value").unwrap(), expected);
}

#[test]
fn test_value_inference() {
    let ini = "[section]\n\
               int_key=42\n\
               float_key=2.75\n\
               bool_true=true\n\
               bool_false=False\n\
               null_val=null\n\
               list_key=one, two, three\n\
               string_key=hello world";
    let result = parse_ini(ini).unwrap();
    let section = result.get("section").unwrap();

    assert_eq!(section.get("int_key"), Some(&ConfigValue::Int(42)));
    assert_eq!(section.get("float_key"), Some(&ConfigValue::Float(2.75)));
    assert_eq!(section.get("bool_true"), Some(&ConfigValue::Bool(true)));
    assert_eq!(section.get("bool_false"), Some(&ConfigValue::Bool(false)));
    assert_eq!(section.get("null_val"), Some(&ConfigValue::Null));
    assert_eq!(
        section.get("list_key"),
        Some(&ConfigValue::from(vec!["one", "two", "three"]))
    );
    assert_eq!(section.get("string_key"), Some(&ConfigValue::from("hello world")));
}

#[test]
fn test_nested_sections() {
    let result = parse_ini("[parent.child]\nkey=value").unwrap();
    assert!(result.get("parent").is_some_and(ConfigValue::is_map));
    assert_eq!(
        result.get_path("parent.child.key"),
        Some(&ConfigValue::from("value"))
    );
}

#[test]
fn test_empty_section_name() {
    let err = parse_ini("[]").unwrap_err();
    assert!(err.to_string().contains("Empty section name"));

    let err = parse_ini("[a..b]").unwrap_err();
    assert!(err.to_string().contains("Empty section name"));
}

#[test]
fn test_invalid_line() {
    let err = parse_ini("[section]\ninvalid_line").unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(err.to_string().contains("Invalid line"));
}

#[test]
fn test_missing_key_before_equals() {
    let err = parse_ini("[sec]\n= value").unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(err.to_string().contains("Missing key"));
}

#[test]
fn test_inline_hash_is_part_of_value() {
    let result = parse_ini("[colors]\nbackground = #ffffff\n").unwrap();
    assert_eq!(
        result.get_path("colors.background"),
        Some(&ConfigValue::from("#ffffff"))
    );
}
