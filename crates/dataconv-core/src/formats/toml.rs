//! TOML parsing and serialization via the `toml` crate.
//!
//! TOML is the strictest target:
//!
//! - a document must be a table, so a top-level array or scalar is rejected;
//! - there is no null, so a `Null` anywhere in the tree is rejected;
//! - arrays must hold one kind of element (`[1, 2.5]` is rejected, since
//!   integer and float are different kinds).
//!
//! The whole tree is converted and checked before any text is produced, so
//! a failure never leaves half a document behind. Parsed datetimes become
//! strings holding their RFC 3339 text.

use ::toml::value::{Table, Value as TomlValue};

use crate::error::{child_path, ParseError, Position, SerializeError};
use crate::format::Format;
use crate::value::{Map, Value};

/// Parse a TOML document into a canonical object.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let table: Table = ::toml::from_str(text).map_err(|err| {
        let mut parse_err = ParseError::new(Format::Toml, err.message().trim().to_string());
        if let Some(span) = err.span() {
            parse_err = parse_err.at(Position::from_offset(text, span.start));
        }
        parse_err.with_source(err)
    })?;
    Ok(Value::Object(from_table(table)))
}

/// Serialize an object as a TOML document.
pub fn serialize(value: &Value) -> Result<String, SerializeError> {
    let table = match value {
        Value::Object(map) => to_table(map, "")?,
        other => {
            return Err(SerializeError::new(
                Format::Toml,
                format!("a TOML document must be a table, found {}", other.kind()),
            )
            .at(""))
        }
    };
    ::toml::to_string(&table)
        .map_err(|err| SerializeError::new(Format::Toml, err.to_string()).with_source(err))
}

fn from_table(table: Table) -> Map {
    table
        .into_iter()
        .map(|(key, value)| (key, from_toml(value)))
        .collect()
}

fn from_toml(value: TomlValue) -> Value {
    match value {
        TomlValue::String(s) => Value::String(s),
        TomlValue::Integer(n) => Value::Integer(n),
        TomlValue::Float(f) => Value::Float(f),
        TomlValue::Boolean(b) => Value::Bool(b),
        TomlValue::Datetime(dt) => Value::String(dt.to_string()),
        TomlValue::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        TomlValue::Table(table) => Value::Object(from_table(table)),
    }
}

fn to_table(map: &Map, path: &str) -> Result<Table, SerializeError> {
    let mut table = Table::new();
    for (key, value) in map {
        table.insert(key.clone(), to_toml(value, &child_path(path, key))?);
    }
    Ok(table)
}

fn to_toml(value: &Value, path: &str) -> Result<TomlValue, SerializeError> {
    match value {
        Value::Null => Err(SerializeError::new(
            Format::Toml,
            "null has no TOML representation",
        )
        .at(path)),
        Value::Bool(b) => Ok(TomlValue::Boolean(*b)),
        Value::Integer(n) => Ok(TomlValue::Integer(*n)),
        Value::Float(f) => Ok(TomlValue::Float(*f)),
        Value::String(s) => Ok(TomlValue::String(s.clone())),
        Value::Array(items) => {
            check_homogeneous(items, path)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| to_toml(item, &child_path(path, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(TomlValue::Array)
        }
        Value::Object(map) => to_table(map, path).map(TomlValue::Table),
    }
}

fn check_homogeneous(items: &[Value], path: &str) -> Result<(), SerializeError> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let expected = first.kind();
    match items.iter().position(|item| item.kind() != expected) {
        Some(idx) => Err(SerializeError::new(
            Format::Toml,
            format!(
                "mixed-type array: element 0 is {expected} but element {idx} is {}",
                items[idx].kind()
            ),
        )
        .at(path)),
        None => Ok(()),
    }
}
