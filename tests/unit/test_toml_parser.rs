//! Unit tests for the TOML parser

use polyconf::{parse_toml, ConfigValue, FormatParser, TomlParser};

fn parse(text: &str) -> ConfigValue {
    parse_toml(text).unwrap()
}

fn error_text(text: &str) -> String {
    parse_toml(text).unwrap_err().to_string()
}

fn strings(items: &[&str]) -> ConfigValue {
    ConfigValue::Array(items.iter().map(|s| ConfigValue::from(*s)).collect())
}

#[test]
fn test_example_document() {
    let document = r#"date_of_creation = 2025-05-12T14:00:00Z
users = ["user1", "user2"]
[database]
host = "localhost"
port = 5432
user = "admin"
password = "password123"
is_active = true
last_login = ""
[logging]
level = "debug"
output = "logfile.txt"
log_rotation_interval = 1.85
[network]
timeout = 30
retries = 3"#;

    let result = TomlParser.parse(document).unwrap();

    assert_eq!(
        result.get("date_of_creation"),
        Some(&ConfigValue::from("2025-05-12T14:00:00Z"))
    );
    assert_eq!(result.get("users"), Some(&strings(&["user1", "user2"])));

    assert_eq!(result.get_path("database.host"), Some(&ConfigValue::from("localhost")));
    assert_eq!(result.get_path("database.port"), Some(&ConfigValue::Int(5432)));
    assert_eq!(result.get_path("database.is_active"), Some(&ConfigValue::Bool(true)));
    assert_eq!(result.get_path("database.last_login"), Some(&ConfigValue::from("")));

    assert_eq!(
        result.get_path("logging.log_rotation_interval"),
        Some(&ConfigValue::Float(1.85))
    );
    assert_eq!(result.get_path("network.timeout"), Some(&ConfigValue::Int(30)));
    assert_eq!(result.get_path("network.retries"), Some(&ConfigValue::Int(3)));
}

#[test]
fn test_string_values() {
    let result = parse(
        r#"
        name = "John Doe"
        single_quote = 'Hello World'
        empty_string = ""
        "#,
    );
    assert_eq!(result.get("name"), Some(&ConfigValue::from("John Doe")));
    assert_eq!(result.get("single_quote"), Some(&ConfigValue::from("Hello World")));
    assert_eq!(result.get("empty_string"), Some(&ConfigValue::from("")));
}

#[test]
fn test_boolean_values_ignore_case() {
    let result = parse(
        "
        enabled = true
        disabled = false
        mixed_case_true = True
        mixed_case_false = FALSE
        ",
    );
    assert_eq!(result.get("enabled"), Some(&ConfigValue::Bool(true)));
    assert_eq!(result.get("disabled"), Some(&ConfigValue::Bool(false)));
    assert_eq!(result.get("mixed_case_true"), Some(&ConfigValue::Bool(true)));
    assert_eq!(result.get("mixed_case_false"), Some(&ConfigValue::Bool(false)));
}

#[test]
fn test_numbers() {
    let result = parse(
        "
        positive = 42
        negative = -17
        zero = 0
        ratio = 6.25
        negative_float = -2.5
        scientific = 1.23e4
        ",
    );
    assert_eq!(result.get("positive"), Some(&ConfigValue::Int(42)));
    assert_eq!(result.get("negative"), Some(&ConfigValue::Int(-17)));
    assert_eq!(result.get("zero"), Some(&ConfigValue::Int(0)));
    assert_eq!(result.get("ratio"), Some(&ConfigValue::Float(6.25)));
    assert_eq!(result.get("negative_float"), Some(&ConfigValue::Float(-2.5)));
    assert_eq!(result.get("scientific"), Some(&ConfigValue::Float(12300.0)));
}

#[test]
fn test_datetimes_stay_strings() {
    let result = parse(
        "
        date1 = 2025-05-12T14:00:00Z
        date2 = 2025-12-31 23:59:59
        ",
    );
    assert_eq!(result.get("date1"), Some(&ConfigValue::from("2025-05-12T14:00:00Z")));
    assert_eq!(result.get("date2"), Some(&ConfigValue::from("2025-12-31 23:59:59")));
}

#[test]
fn test_arrays() {
    let result = parse(
        r#"
        numbers = [1, 2, 3, 4, 5]
        strings = ["apple", "banana", "cherry"]
        booleans = [true, false, true]
        empty = []
        mixed = [1, "two", true, 4.5]
        nested = [[1, 2], [3, 4], [5, 6]]
        "#,
    );
    assert_eq!(result.get("numbers"), Some(&ConfigValue::from(vec![1, 2, 3, 4, 5])));
    assert_eq!(result.get("strings"), Some(&strings(&["apple", "banana", "cherry"])));
    assert_eq!(
        result.get("booleans"),
        Some(&ConfigValue::from(vec![true, false, true]))
    );
    assert_eq!(result.get("empty"), Some(&ConfigValue::Array(vec![])));
    assert_eq!(
        result.get("mixed"),
        Some(&ConfigValue::Array(vec![
            1.into(),
            "two".into(),
            true.into(),
            4.5.into()
        ]))
    );
    assert_eq!(
        result.get("nested"),
        Some(&ConfigValue::Array(vec![
            ConfigValue::from(vec![1, 2]),
            ConfigValue::from(vec![3, 4]),
            ConfigValue::from(vec![5, 6]),
        ]))
    );
}

#[test]
fn test_arrays_with_quotes_and_commas() {
    let result = parse(r#"tricky = ["hello, world", 'it\'s working', "quote: \"test\""]"#);
    assert_eq!(
        result.get("tricky"),
        Some(&strings(&["hello, world", "it's working", "quote: \"test\""]))
    );
}

#[test]
fn test_sections() {
    let result = parse(
        r#"
        global_key = "global"

        [section1]
        key1 = "value1"

        [section2]
        key2 = "value2"
        "#,
    );
    assert_eq!(result.get("global_key"), Some(&ConfigValue::from("global")));
    assert_eq!(result.get_path("section1.key1"), Some(&ConfigValue::from("value1")));
    assert_eq!(result.get_path("section2.key2"), Some(&ConfigValue::from("value2")));
}

#[test]
fn test_nested_sections() {
    let result = parse(
        r#"
        [parent]
        parent_key = "parent_value"

        [parent.child]
        child_key = "child_value"

        [parent.child.grandchild]
        grandchild_key = "grandchild_value"
        "#,
    );
    assert_eq!(
        result.get_path("parent.parent_key"),
        Some(&ConfigValue::from("parent_value"))
    );
    assert_eq!(
        result.get_path("parent.child.child_key"),
        Some(&ConfigValue::from("child_value"))
    );
    assert_eq!(
        result.get_path("parent.child.grandchild.grandchild_key"),
        Some(&ConfigValue::from("grandchild_value"))
    );
}

#[test]
fn test_section_with_special_characters() {
    let result = parse("[my-section_1]\nkey = \"value\"\n");
    assert_eq!(result.get_path("my-section_1.key"), Some(&ConfigValue::from("value")));
}

#[test]
fn test_comments_and_blank_lines() {
    let result = parse(
        r#"

        # This is a comment
        key1 = "value1"  # trailing comment


        [section]
        # Comment in section
        key2 = "value2"

        "#,
    );
    assert_eq!(result.get("key1"), Some(&ConfigValue::from("value1")));
    assert_eq!(result.get_path("section.key2"), Some(&ConfigValue::from("value2")));
}

#[test]
fn test_string_escapes() {
    let result = parse(
        r#"
        newline = "line1\nline2"
        tab = "col1\tcol2"
        quote = "He said \"hello\""
        backslash = "path\\to\\file"
        "#,
    );
    assert_eq!(result.get("newline"), Some(&ConfigValue::from("line1\nline2")));
    assert_eq!(result.get("tab"), Some(&ConfigValue::from("col1\tcol2")));
    assert_eq!(result.get("quote"), Some(&ConfigValue::from("He said \"hello\"")));
    assert_eq!(result.get("backslash"), Some(&ConfigValue::from("path\\to\\file")));
}

#[test]
fn test_error_messages() {
    assert!(error_text("[]").contains("Empty section header"));
    assert!(error_text("= \"value\"").contains("Missing key before '='"));
    assert!(error_text("key \"value\"").contains("Invalid line format"));
    assert!(error_text("key = \"value1\"\nkey = \"value2\"").contains("Duplicate key"));
    assert!(error_text("key with spaces = \"value\"").contains("Invalid key format"));
    assert!(error_text("arr = [\"unterminated]").contains("Unterminated string"));
    assert!(error_text("[section..subsection]").contains("empty part"));
}

#[test]
fn test_line_number_in_errors() {
    let document = "
        valid_key = \"value\"

        invalid line without equals
        ";
    let err = parse_toml(document).unwrap_err();
    assert_eq!(err.line(), 4);
    assert!(err.to_string().contains("line 4"));
}

#[test]
fn test_trailing_text_after_string() {
    assert!(error_text("name = \"a\" b").contains("Unexpected characters after string"));
}
