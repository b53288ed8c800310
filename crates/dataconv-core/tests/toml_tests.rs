use dataconv_core::formats::{json, toml};
use dataconv_core::{Format, Value};

fn from_json(text: &str) -> Value {
    json::parse(text).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn tables_and_arrays_of_tables() {
    let value = toml::parse(
        "title = \"demo\"\n\n[owner]\nname = \"Ann\"\n\n[[items]]\nid = 1\n\n[[items]]\nid = 2\n",
    )
    .unwrap();
    let expected = from_json(
        r#"{"title":"demo","owner":{"name":"Ann"},"items":[{"id":1},{"id":2}]}"#,
    );
    assert_eq!(value, expected);
}

#[test]
fn scalar_types_are_kept() {
    let value = toml::parse("i = 7\nf = 7.0\nb = true\ns = \"x\"\n").unwrap();
    assert_eq!(value.get("i"), Some(&Value::Integer(7)));
    assert_eq!(value.get("f"), Some(&Value::Float(7.0)));
    assert_eq!(value.get("b"), Some(&Value::Bool(true)));
    assert_eq!(value.get("s"), Some(&Value::from("x")));
}

#[test]
fn datetimes_become_strings() {
    let value = toml::parse("when = 1979-05-27T07:32:00Z\nday = 1979-05-27\n").unwrap();
    assert_eq!(value.get("when"), Some(&Value::from("1979-05-27T07:32:00Z")));
    assert_eq!(value.get("day"), Some(&Value::from("1979-05-27")));
}

#[test]
fn key_order_is_preserved() {
    let value = toml::parse("zeta = 1\nalpha = 2\n").unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["zeta", "alpha"]);
}

#[test]
fn empty_document_is_empty_object() {
    assert_eq!(toml::parse("").unwrap(), from_json("{}"));
}

#[test]
fn malformed_input_reports_position() {
    let err = toml::parse("a = 1\nb = \n").unwrap_err();
    assert_eq!(err.format, Format::Toml);
    assert_eq!(err.position.map(|p| p.line), Some(2));
    assert!(err.source.is_some());
}

#[test]
fn duplicate_keys_are_rejected_by_toml_itself() {
    assert!(toml::parse("a = 1\na = 2\n").is_err());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn roundtrip_through_toml() {
    let value = from_json(
        r#"{"name":"svc","port":8080,"ratio":0.5,"tags":["a","b"],"db":{"host":"h","pool":{"max":4}},"replicas":[{"id":1},{"id":2}]}"#,
    );
    let text = toml::serialize(&value).unwrap();
    assert_eq!(toml::parse(&text).unwrap(), value, "toml was:\n{text}");
}

#[test]
fn output_preserves_key_order() {
    let text = toml::serialize(&from_json(r#"{"zeta":1,"alpha":2}"#)).unwrap();
    assert_eq!(text, "zeta = 1\nalpha = 2\n");
}

#[test]
fn null_is_rejected_with_path() {
    let err = toml::serialize(&from_json(r#"{"a":{"b":null}}"#)).unwrap_err();
    assert_eq!(err.format, Format::Toml);
    assert_eq!(err.path.as_deref(), Some("/a/b"));
    assert!(err.reason.contains("null"));
}

#[test]
fn null_inside_array_of_tables_is_rejected() {
    let err = toml::serialize(&from_json(r#"{"a":[{"ok":1},{"b":null}]}"#)).unwrap_err();
    assert_eq!(err.path.as_deref(), Some("/a/1/b"));
}

#[test]
fn mixed_array_is_rejected() {
    let err = toml::serialize(&from_json(r#"{"a":[1,"x"]}"#)).unwrap_err();
    assert_eq!(err.path.as_deref(), Some("/a"));
    assert!(err.reason.contains("mixed"), "reason: {}", err.reason);
}

#[test]
fn integer_and_float_do_not_mix() {
    let err = toml::serialize(&from_json(r#"{"a":[1,2.5]}"#)).unwrap_err();
    assert!(err.reason.contains("integer") && err.reason.contains("float"));
}

#[test]
fn nested_arrays_are_checked_individually() {
    let ok = from_json(r#"{"matrix":[[1,2],[3,4]],"names":[["a"],["b","c"]]}"#);
    assert!(toml::serialize(&ok).is_ok());
    let bad = from_json(r#"{"matrix":[[1,2],[3,"x"]]}"#);
    let err = toml::serialize(&bad).unwrap_err();
    assert_eq!(err.path.as_deref(), Some("/matrix/1"));
}

#[test]
fn top_level_must_be_a_table() {
    for text in ["[1,2]", "42", "\"s\"", "null"] {
        let err = toml::serialize(&from_json(text)).unwrap_err();
        assert!(err.reason.contains("must be a table"), "{text}: {}", err.reason);
    }
}

#[test]
fn keys_needing_quotes_roundtrip() {
    let value = from_json(r#"{"with space":1,"dot.ted":2}"#);
    let text = toml::serialize(&value).unwrap();
    assert_eq!(toml::parse(&text).unwrap(), value, "toml was:\n{text}");
}
