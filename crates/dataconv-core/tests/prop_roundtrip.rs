/// Property-based round-trip tests over generated canonical values.
///
/// Strategies generate:
/// - Strings with edge cases (empty, unicode, lookalikes of other types)
/// - Integers and "simple" floats (mantissa / 10^n, never whole)
/// - Booleans and null
/// - Nested objects and arrays up to 3 levels deep
///
/// Properties:
/// - JSON → JSON and JSON → YAML → JSON give back an equal value
/// - null-free tables survive TOML
/// - string-only objects survive XML
/// - any value holding a null fails to serialize as TOML
use dataconv_core::formats::{json, toml, xml, yaml};
use dataconv_core::{ErrorKind, Map, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}").unwrap()
}

/// Strings that must come back as strings from every format.
fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        prop::string::string_regex("[a-zA-Z:,\\-\\. ]{0,20}").unwrap(),
        Just(String::new()),
        // Lookalikes of other types
        Just("true".to_string()),
        Just("False".to_string()),
        Just("null".to_string()),
        Just("~".to_string()),
        Just("42".to_string()),
        Just("-1".to_string()),
        Just("3.14".to_string()),
        Just("0x1F".to_string()),
        Just(".inf".to_string()),
        // Whitespace and indicators
        " [a-zA-Z]{1,10} ".prop_map(|s| s),
        Just("- item".to_string()),
        Just("key: value".to_string()),
        Just("#comment".to_string()),
        Just("&anchor".to_string()),
        Just("*alias".to_string()),
        Just("!tag".to_string()),
        // Unicode and escapes
        Just("caf\u{00e9}".to_string()),
        Just("\u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        Just("say \"hi\"".to_string()),
        Just("path\\to\\file".to_string()),
    ]
}

fn arb_integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1_000_000i64..1_000_000i64).prop_map(Value::Integer),
        Just(Value::Integer(i64::MAX)),
        Just(Value::Integer(i64::MIN)),
    ]
}

/// Floats built as mantissa / 10^n so they print and re-read exactly.
fn arb_float() -> impl Strategy<Value = Value> {
    (-100_000_000i64..100_000_000i64, 1u32..5u32).prop_filter_map(
        "float must not be whole",
        |(mantissa, decimals)| {
            let f = mantissa as f64 / 10f64.powi(decimals as i32);
            (f.fract() != 0.0).then_some(Value::Float(f))
        },
    )
}

/// Scalars without null.
fn arb_defined_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_string().prop_map(Value::String),
        arb_integer(),
        arb_float(),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => arb_defined_scalar(),
        1 => Just(Value::Null),
    ]
}

fn object_from(pairs: Vec<(String, Value)>) -> Value {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key, value);
    }
    Value::Object(map)
}

fn arb_value_inner(depth: u32) -> BoxedStrategy<Value> {
    if depth == 0 {
        arb_scalar().boxed()
    } else {
        prop_oneof![
            4 => arb_scalar(),
            2 => prop::collection::vec((arb_key(), arb_value_inner(depth - 1)), 0..5)
                .prop_map(object_from),
            2 => prop::collection::vec(arb_value_inner(depth - 1), 0..5)
                .prop_map(Value::Array),
        ]
        .boxed()
    }
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_inner(3)
}

/// TOML-representable tables: no null, arrays hold one scalar kind or
/// tables only.
fn arb_toml_table(depth: u32) -> BoxedStrategy<Value> {
    let leaf = prop_oneof![
        4 => arb_defined_scalar(),
        1 => prop::collection::vec(arb_string().prop_map(Value::String), 0..4).prop_map(Value::Array),
        1 => prop::collection::vec(arb_integer(), 0..4).prop_map(Value::Array),
    ];
    let entry = if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            4 => leaf,
            1 => arb_toml_table(depth - 1),
            1 => prop::collection::vec(arb_toml_table(depth - 1), 1..3).prop_map(Value::Array),
        ]
        .boxed()
    };
    prop::collection::vec((arb_key(), entry), 0..6)
        .prop_map(object_from)
        .boxed()
}

/// XML text survives only when it has no surrounding whitespace.
fn arb_xml_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9]([a-zA-Z0-9 <>&\"']{0,20}[a-zA-Z0-9])?",
    ]
}

fn arb_xml_object() -> impl Strategy<Value = Value> {
    prop::collection::vec(
        (
            arb_key(),
            prop_oneof![
                3 => arb_xml_text().prop_map(Value::String),
                1 => prop::collection::vec(arb_xml_text().prop_map(Value::String), 2..4)
                    .prop_map(Value::Array),
            ],
        ),
        1..6,
    )
    .prop_map(object_from)
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn json_roundtrip(value in arb_value()) {
        for compact in [false, true] {
            let text = json::serialize(&value, compact).unwrap();
            let back = json::parse(&text).unwrap();
            prop_assert_eq!(&back, &value, "json was: {}", text);
        }
    }

    #[test]
    fn json_yaml_json_roundtrip(value in arb_value()) {
        let json_text = json::serialize(&value, false).unwrap();
        let yaml_text = yaml::serialize(&json::parse(&json_text).unwrap()).unwrap();
        let back = yaml::parse(&yaml_text).unwrap();
        prop_assert_eq!(&back, &value, "yaml was:\n{}", yaml_text);
    }

    #[test]
    fn toml_roundtrip(value in arb_toml_table(2)) {
        let text = toml::serialize(&value).unwrap();
        let back = toml::parse(&text).unwrap();
        prop_assert_eq!(&back, &value, "toml was:\n{}", text);
    }

    #[test]
    fn xml_roundtrip_for_string_objects(value in arb_xml_object()) {
        let text = xml::serialize(&value, "root").unwrap();
        let back = xml::parse(&text).unwrap();
        prop_assert_eq!(&back, &value, "xml was:\n{}", text);
    }

    #[test]
    fn null_never_reaches_toml(value in arb_value(), key in arb_key()) {
        let mut map = Map::new();
        map.insert(key, Value::Array(vec![value]));
        map.insert("nothing".to_string(), Value::Null);
        let doc = Value::Object(map);
        prop_assert!(contains_null(&doc));
        let err = dataconv_core::Converter::default()
            .serialize(&doc, dataconv_core::Format::Toml)
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Serialize);
    }

    #[test]
    fn parsers_never_panic(text in "\\PC{0,64}") {
        let _ = json::parse(&text);
        let _ = yaml::parse(&text);
        let _ = toml::parse(&text);
        let _ = xml::parse(&text);
    }
}
