//! YAML parsing (`yaml-rust` events) and serialization (`serde_yaml`).
//!
//! # Parsing rules
//!
//! - Only the first document is loaded; anything after it is ignored.
//! - Anchors, aliases and tags are rejected. Silently expanding them would
//!   make a later round trip look lossless when it is not.
//! - Plain scalars resolve by the YAML 1.2 core schema (`null`, `~`, `true`,
//!   `0x1F`, `1.5e3`, `.inf`, ...). Quoted and block scalars are always
//!   strings, so `"42"` stays a string.
//! - Mapping keys are taken as their source text and must be scalars.
//!
//! # Serialization
//!
//! Block style with 2-space indentation and no `---` marker. Strings that
//! would resolve to another type are quoted by the emitter.

use once_cell::sync::Lazy;
use regex::Regex;
use yaml_rust::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust::scanner::{Marker, ScanError, Scanner, TScalarStyle, Token, TokenType};

use crate::error::{ParseError, Position, SerializeError};
use crate::format::Format;
use crate::formats::strip_location;
use crate::value::{Map, Value};

static DECIMAL_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());
static OCTAL_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0o[0-7]+$").unwrap());
static HEX_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").unwrap());
static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$").unwrap()
});
static INFINITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\.(inf|Inf|INF)$").unwrap());
static NAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.(nan|NaN|NAN)$").unwrap());

/// Parse the first YAML document in `text`. An empty stream is `Null`.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    reject_unsupported(text)?;

    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(text.chars());
    parser.load(&mut builder, false).map_err(scan_error)?;
    if let Some(err) = builder.error {
        return Err(err);
    }
    Ok(builder.root.unwrap_or(Value::Null))
}

/// Serialize a value as block-style YAML.
pub fn serialize(value: &Value) -> Result<String, SerializeError> {
    serde_yaml::to_string(value)
        .map_err(|err| SerializeError::new(Format::Yaml, err.to_string()).with_source(err))
}

/// Resolve a plain (unquoted) scalar by the YAML 1.2 core schema.
pub fn resolve_plain(text: &str) -> Result<Value, String> {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Ok(Value::Null),
        "true" | "True" | "TRUE" => return Ok(Value::Bool(true)),
        "false" | "False" | "FALSE" => return Ok(Value::Bool(false)),
        _ => {}
    }

    let integer = if DECIMAL_INT.is_match(text) {
        Some(text.parse::<i64>())
    } else if OCTAL_INT.is_match(text) {
        Some(i64::from_str_radix(&text[2..], 8))
    } else if HEX_INT.is_match(text) {
        Some(i64::from_str_radix(&text[2..], 16))
    } else {
        None
    };
    if let Some(parsed) = integer {
        return parsed
            .map(Value::Integer)
            .map_err(|_| format!("integer {text} does not fit in a signed 64-bit integer"));
    }

    if FLOAT.is_match(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Ok(Value::Float(f));
        }
    }
    if INFINITY.is_match(text) {
        let f = if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Ok(Value::Float(f));
    }
    if NAN.is_match(text) {
        return Ok(Value::Float(f64::NAN));
    }

    Ok(Value::String(text.to_string()))
}

/// Token-level pass over the first document looking for anchors, aliases
/// and tags. The event parser resolves aliases on its own and drops tags on
/// collections, so they have to be caught before it runs.
///
/// Scanner errors end the pass early; the event parser reports them.
fn reject_unsupported(text: &str) -> Result<(), ParseError> {
    let mut scanner = Scanner::new(text.chars());
    let mut seen_content = false;

    for Token(mark, token) in scanner.by_ref() {
        let construct = match token {
            TokenType::Anchor(name) => format!("anchor '&{name}'"),
            TokenType::Alias(name) => format!("alias '*{name}'"),
            TokenType::Tag(handle, suffix) => format!("tag '{handle}{suffix}'"),
            // Reserved directives (`%FOO bar`) arrive with an empty handle.
            TokenType::TagDirective(handle, _) if handle.is_empty() => continue,
            TokenType::TagDirective(handle, prefix) => {
                format!("tag directive '%TAG {handle} {prefix}'")
            }
            TokenType::DocumentStart if seen_content => break,
            TokenType::DocumentEnd => break,
            TokenType::StreamStart(_)
            | TokenType::StreamEnd
            | TokenType::VersionDirective(..)
            | TokenType::DocumentStart => continue,
            _ => {
                seen_content = true;
                continue;
            }
        };
        return Err(unsupported(&construct, mark));
    }
    Ok(())
}

fn unsupported(construct: &str, mark: Marker) -> ParseError {
    ParseError::new(
        Format::Yaml,
        format!("unsupported YAML construct: {construct}"),
    )
    .at(position(mark))
}

fn position(mark: Marker) -> Position {
    Position::new(mark.line(), mark.col() + 1)
}

fn scan_error(err: ScanError) -> ParseError {
    let mark = *err.marker();
    ParseError::new(Format::Yaml, strip_location(&err.to_string()))
        .at(position(mark))
        .with_source(err)
}

enum Frame {
    Sequence(Vec<Value>),
    Mapping { map: Map, key: Option<String> },
}

/// Assembles a [`Value`] from parser events. The first error wins; later
/// events are ignored because the receiver interface cannot stop the parser.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
    error: Option<ParseError>,
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(event, mark) {
            self.error = Some(err);
        }
    }
}

impl TreeBuilder {
    fn handle(&mut self, event: Event, mark: Marker) -> Result<(), ParseError> {
        match event {
            Event::Alias(_) => Err(unsupported("alias", mark)),
            Event::Scalar(text, style, anchor, tag) => {
                if anchor > 0 {
                    return Err(unsupported("anchor", mark));
                }
                if tag.is_some() {
                    return Err(unsupported("tag", mark));
                }
                if let Some(Frame::Mapping { key: slot @ None, .. }) = self.stack.last_mut() {
                    *slot = Some(text);
                    return Ok(());
                }
                let value = match style {
                    TScalarStyle::Plain | TScalarStyle::Any => resolve_plain(&text)
                        .map_err(|message| ParseError::new(Format::Yaml, message).at(position(mark)))?,
                    _ => Value::String(text),
                };
                self.attach(value, mark)
            }
            Event::SequenceStart(anchor) => {
                self.open(anchor, mark)?;
                self.stack.push(Frame::Sequence(Vec::new()));
                Ok(())
            }
            Event::MappingStart(anchor) => {
                self.open(anchor, mark)?;
                self.stack.push(Frame::Mapping {
                    map: Map::new(),
                    key: None,
                });
                Ok(())
            }
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence(items)) => self.attach(Value::Array(items), mark),
                _ => Err(ParseError::new(Format::Yaml, "unbalanced sequence end").at(position(mark))),
            },
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping { map, .. }) => self.attach(Value::Object(map), mark),
                _ => Err(ParseError::new(Format::Yaml, "unbalanced mapping end").at(position(mark))),
            },
            _ => Ok(()),
        }
    }

    /// A collection may not start where a mapping key is expected.
    fn open(&self, anchor: usize, mark: Marker) -> Result<(), ParseError> {
        if anchor > 0 {
            return Err(unsupported("anchor", mark));
        }
        if let Some(Frame::Mapping { key: None, .. }) = self.stack.last() {
            return Err(ParseError::new(Format::Yaml, "mapping keys must be scalars").at(position(mark)));
        }
        Ok(())
    }

    fn attach(&mut self, value: Value, mark: Marker) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                Ok(())
            }
            Some(Frame::Sequence(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Mapping { map, key }) => match key.take() {
                Some(key) => {
                    map.insert(key, value);
                    Ok(())
                }
                None => Err(ParseError::new(Format::Yaml, "mapping keys must be scalars").at(position(mark))),
            },
        }
    }
}
