//! Conversion orchestrator: source text → [`Value`] → target text.
//!
//! Every conversion goes through the canonical value; formats are never
//! converted into each other directly. Converting a format into itself still
//! parses and re-serializes, which normalizes indentation and key quoting.
//!
//! # Example
//! ```
//! use dataconv_core::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions::default().with_xml_root("config"));
//! let xml = converter.convert(r#"{"port": 8080}"#, "json", "XML").unwrap();
//! assert!(xml.contains("<config>"));
//! assert!(xml.contains("<port>8080</port>"));
//! ```

use tracing::debug;

use crate::error::{ConvertError, Result, Side};
use crate::format::Format;
use crate::formats::{json, toml, xml, yaml};
use crate::value::Value;

/// Serializer settings. Built once and shared; never mutated per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Root element name for XML output. When unset, an XML source's own
    /// root name is reused, falling back to `root`.
    pub xml_root: Option<String>,
    /// Emit JSON on one line instead of 2-space pretty printing.
    pub compact_json: bool,
}

impl ConvertOptions {
    pub fn with_xml_root(mut self, root: impl Into<String>) -> Self {
        self.xml_root = Some(root.into());
        self
    }

    pub fn with_compact_json(mut self, compact: bool) -> Self {
        self.compact_json = compact;
        self
    }
}

/// A parsed source document: the canonical value plus format metadata that
/// does not fit the value model.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub value: Value,
    /// Root element name when the source was XML.
    pub xml_root: Option<String>,
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self {
            value,
            xml_root: None,
        }
    }
}

/// Converts documents between formats with a fixed set of options.
///
/// A `Converter` holds no per-call state, so one instance can serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `content` between two format tokens (`json`, `xml`, `yaml`,
    /// `yml`, `toml`; case-insensitive).
    ///
    /// Both tokens are resolved before any parsing happens.
    pub fn convert(&self, content: &str, from: &str, to: &str) -> Result<String> {
        let source = resolve(from, Side::Source)?;
        let target = resolve(to, Side::Target)?;
        self.convert_formats(content, source, target)
    }

    /// Convert `content` between two already-resolved formats.
    pub fn convert_formats(&self, content: &str, source: Format, target: Format) -> Result<String> {
        debug!(%source, %target, input_bytes = content.len(), "converting document");
        let result = self
            .parse(content, source)
            .and_then(|doc| self.serialize_document(&doc, target));
        match &result {
            Ok(output) => debug!(%source, %target, output_bytes = output.len(), "conversion finished"),
            Err(err) => debug!(%source, %target, error = %err, "conversion failed"),
        }
        result
    }

    /// Parse `content` into the canonical model.
    pub fn parse(&self, content: &str, format: Format) -> Result<Document> {
        let doc = match format {
            Format::Json => Document::from(json::parse(content)?),
            Format::Yaml => Document::from(yaml::parse(content)?),
            Format::Toml => Document::from(toml::parse(content)?),
            Format::Xml => {
                let parsed = xml::parse_document(content)?;
                Document {
                    value: parsed.value,
                    xml_root: Some(parsed.root),
                }
            }
        };
        Ok(doc)
    }

    /// Serialize a canonical value into `format`.
    pub fn serialize(&self, value: &Value, format: Format) -> Result<String> {
        let root = self.options.xml_root.as_deref().unwrap_or(xml::DEFAULT_ROOT);
        self.write(value, format, root)
    }

    fn serialize_document(&self, doc: &Document, format: Format) -> Result<String> {
        let root = self
            .options
            .xml_root
            .as_deref()
            .or(doc.xml_root.as_deref())
            .unwrap_or(xml::DEFAULT_ROOT);
        self.write(&doc.value, format, root)
    }

    fn write(&self, value: &Value, format: Format, xml_root: &str) -> Result<String> {
        let out = match format {
            Format::Json => json::serialize(value, self.options.compact_json)?,
            Format::Yaml => yaml::serialize(value)?,
            Format::Toml => toml::serialize(value)?,
            Format::Xml => xml::serialize(value, xml_root)?,
        };
        Ok(out)
    }
}

/// Convert with default options. See [`Converter::convert`].
pub fn convert(content: &str, from: &str, to: &str) -> Result<String> {
    Converter::default().convert(content, from, to)
}

fn resolve(token: &str, side: Side) -> Result<Format> {
    Format::from_token(token).ok_or_else(|| ConvertError::UnsupportedFormat {
        token: token.to_string(),
        side,
    })
}
