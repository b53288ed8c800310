//! The closed set of supported formats.

use std::fmt;
use std::path::Path;

/// A serialization format known to the engine.
///
/// Token matching is case-insensitive and `yml` is an alias of [`Format::Yaml`].
/// Adding a format means adding a variant here; every `match` on it in the
/// orchestrator then has to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    Yaml,
    Toml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Xml, Format::Yaml, Format::Toml];

    /// Resolve a format token such as `"JSON"` or `"yml"`.
    pub fn from_token(token: &str) -> Option<Format> {
        match token.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    /// Infer the format from a file name's extension.
    pub fn from_extension(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_token)
    }

    /// Canonical lowercase token.
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }

    /// Tokens accepted for this format besides [`Format::name`].
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yml"],
            Format::Json | Format::Xml | Format::Toml => &[],
        }
    }

    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// MIME type for HTTP responses carrying this format.
    pub fn media_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
            Format::Yaml => "application/yaml",
            Format::Toml => "application/toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
