//! # dataconv-core
//!
//! Converts structured documents between **JSON**, **XML**, **YAML** and **TOML**.
//!
//! Every conversion parses the source into a canonical [`Value`] and
//! serializes that value into the target; no two formats are ever wired
//! together directly. A new format needs one parser and one serializer, not
//! a converter per existing format.
//!
//! ## Quick start
//!
//! ```rust
//! use dataconv_core::convert;
//!
//! let yaml = convert(r#"{"name":"Alice","scores":[95,87]}"#, "json", "yaml").unwrap();
//! assert!(yaml.starts_with("name: Alice\n"));
//!
//! // TOML has no null
//! let err = convert(r#"{"a":null}"#, "json", "toml").unwrap_err();
//! assert_eq!(err.kind(), dataconv_core::ErrorKind::Serialize);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the canonical `Value` model
//! - [`formats`]: per-format `parse`/`serialize` (JSON, YAML, TOML, XML)
//! - [`format`]: the closed `Format` enumeration and token matching
//! - [`convert`](mod@convert): the `Converter` orchestrator
//! - [`error`]: the error taxonomy (unsupported format, parse, serialize)

pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod value;

pub use convert::{convert, ConvertOptions, Converter, Document};
pub use error::{ConvertError, ErrorKind, ParseError, Position, SerializeError, Side};
pub use format::Format;
pub use value::{Map, Value, ValueKind};
