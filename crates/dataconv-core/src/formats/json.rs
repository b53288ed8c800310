//! JSON parsing and serialization via `serde_json`.
//!
//! Parsing deserializes straight into [`Value`], so duplicate keys keep the
//! first position and the last value and numbers without a fraction or
//! exponent become [`Value::Integer`]. Serialization writes 2-space pretty
//! JSON by default; `serde_json` prints floats with a decimal point or an
//! exponent, so `Float(5.0)` survives as `5.0`.
//!
//! # Example
//! ```
//! use dataconv_core::formats::json;
//! use dataconv_core::Value;
//!
//! let value = json::parse(r#"{"n": 1, "f": 1.5}"#).unwrap();
//! assert_eq!(value.get("n"), Some(&Value::Integer(1)));
//! assert_eq!(json::serialize(&value, true).unwrap(), r#"{"n":1,"f":1.5}"#);
//! ```

use crate::error::{child_path, ParseError, Position, SerializeError};
use crate::format::Format;
use crate::formats::strip_location;
use crate::value::Value;

/// Parse JSON text into a canonical value.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|err| {
        let message = strip_location(&err.to_string());
        let mut parse_err = ParseError::new(Format::Json, message);
        if err.line() > 0 {
            parse_err = parse_err.at(Position::new(err.line(), err.column()));
        }
        parse_err.with_source(err)
    })
}

/// Serialize a value as JSON, pretty-printed unless `compact` is set.
///
/// JSON numbers cannot be NaN or infinite; such floats are rejected with
/// their path instead of being written as `null`.
pub fn serialize(value: &Value, compact: bool) -> Result<String, SerializeError> {
    check_finite(value, "")?;
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    out.map_err(|err| SerializeError::new(Format::Json, err.to_string()).with_source(err))
}

fn check_finite(value: &Value, path: &str) -> Result<(), SerializeError> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(SerializeError::new(
            Format::Json,
            format!("non-finite float {f} has no JSON representation"),
        )
        .at(path)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_finite(item, &child_path(path, &i.to_string()))),
        Value::Object(map) => map
            .iter()
            .try_for_each(|(key, item)| check_finite(item, &child_path(path, key))),
        _ => Ok(()),
    }
}
