//! One module per format, each exposing `parse` and `serialize`.
//!
//! Parsers turn text into a [`Value`](crate::Value); serializers turn a
//! borrowed value back into text. Formats never talk to each other directly.

pub mod json;
pub mod toml;
pub mod xml;
pub mod yaml;

/// Render a float so it re-parses as a float: `5.0` rather than `5`,
/// exponent form for very large or small magnitudes.
pub(crate) fn format_float(f: f64) -> String {
    format!("{f:?}")
}

/// Library error messages often end in " at line X column Y"; the position
/// is reported separately, so drop the suffix.
pub(crate) fn strip_location(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}
