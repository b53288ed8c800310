//! Error types for parsing, serialization and format dispatch.
//!
//! Every failure inside the engine is classified into one of three kinds
//! (see [`ErrorKind`]). The library error that triggered it is kept as the
//! `source()` of the returned error so callers can inspect the root cause.

use std::fmt;

use thiserror::Error;

use crate::format::Format;

/// Boxed underlying library error.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of a conversion a format token was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// The three error kinds exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    Parse,
    Serialize,
}

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Map a byte offset into `text` to a line/column pair.
    ///
    /// Offsets past the end clamp to the end of the text. Columns count
    /// characters, not bytes.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The source text was malformed for its declared format.
#[derive(Error, Debug)]
#[error("{format} parse error{}: {message}", at_position(.position))]
pub struct ParseError {
    pub format: Format,
    pub position: Option<Position>,
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

impl ParseError {
    pub fn new(format: Format, message: impl Into<String>) -> Self {
        Self {
            format,
            position: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

/// The canonical value cannot be represented in the target format.
#[derive(Error, Debug)]
#[error("cannot serialize to {format}{}: {reason}", at_path(.path))]
pub struct SerializeError {
    pub format: Format,
    /// JSON-pointer style path of the offending value (`/a/0/b`).
    pub path: Option<String>,
    pub reason: String,
    #[source]
    pub source: Option<Cause>,
}

impl SerializeError {
    pub fn new(format: Format, reason: impl Into<String>) -> Self {
        Self {
            format,
            path: None,
            reason: reason.into(),
            source: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

/// Errors returned by the conversion entry points.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A format token was not recognized.
    #[error("unsupported {side} format '{token}' (expected one of: json, xml, yaml, yml, toml)")]
    UnsupportedFormat { token: String, side: Side },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ConvertError::Parse(_) => ErrorKind::Parse,
            ConvertError::Serialize(_) => ErrorKind::Serialize,
        }
    }

    /// The format whose parser or serializer failed, if one was selected.
    pub fn format(&self) -> Option<Format> {
        match self {
            ConvertError::UnsupportedFormat { .. } => None,
            ConvertError::Parse(err) => Some(err.format),
            ConvertError::Serialize(err) => Some(err.format),
        }
    }
}

/// Convenience alias used throughout dataconv-core.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Extend a JSON-pointer path by one segment, escaping `~` and `/`.
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

fn at_position(position: &Option<Position>) -> String {
    position.map(|p| format!(" at {p}")).unwrap_or_default()
}

fn at_path(path: &Option<String>) -> String {
    match path.as_deref() {
        Some("") => " at /".to_string(),
        Some(path) => format!(" at {path}"),
        None => String::new(),
    }
}
