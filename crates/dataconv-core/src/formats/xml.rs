//! XML parsing (`quick-xml` events) and serialization.
//!
//! XML has attributes, child elements and text where the canonical model
//! only has objects, arrays and scalars. The mapping is fixed as follows
//! and applies in both directions:
//!
//! | XML                                   | canonical value                    |
//! |---------------------------------------|------------------------------------|
//! | root element name                     | metadata only ([`XmlDocument`])    |
//! | element with only text (or empty)     | `String` of the trimmed text       |
//! | attribute `id="7"`                    | key `"@id"` with `String("7")`     |
//! | child element `<a>`                   | key `"a"`                          |
//! | repeated siblings `<a/><a/>`          | key `"a"` holding an `Array`       |
//! | text next to attributes or children   | key `"#text"`                      |
//!
//! The mapping is lossy. Parsed scalars are always strings. A one-element
//! array comes back as the bare element, and an empty array is not written
//! at all. The order of text interleaved with child elements is not kept.
//! Namespace prefixes are kept as part of the name and never resolved.
//!
//! Text pieces split by comments or CDATA are joined as written and trimmed
//! once per element. An array directly inside an array has no XML shape and
//! is rejected on output. Nesting deeper than [`MAX_DEPTH`] elements is
//! rejected in both directions.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{child_path, ParseError, Position, SerializeError};
use crate::format::Format;
use crate::formats::format_float;
use crate::value::{Map, Value};

/// Element name used when the caller does not supply one.
pub const DEFAULT_ROOT: &str = "root";

/// Key prefix marking attributes.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding text content of elements that also have attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Element name for items of a top-level array.
pub const ITEM_ELEMENT: &str = "item";

/// Deepest element nesting accepted by the parser and the writer.
pub const MAX_DEPTH: usize = 128;

/// A parsed XML document: the root element's name plus its content.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: String,
    pub value: Value,
}

/// Parse XML into a canonical value, discarding the root element's name.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_document(text).map(|doc| doc.value)
}

/// Parse XML, keeping the root element's name alongside the value.
pub fn parse_document(text: &str) -> Result<XmlDocument, ParseError> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|err| {
            let at = reader.buffer_position() as usize;
            ParseError::new(Format::Xml, err.to_string())
                .at(Position::from_offset(text, at))
                .with_source(err)
        })?;
        let fail = |message: String| {
            ParseError::new(Format::Xml, message).at(Position::from_offset(text, offset))
        };
        match event {
            Event::Start(tag) => {
                if root.is_some() && stack.is_empty() {
                    return Err(fail("multiple root elements".to_string()));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(fail(format!("nesting too deep (limit {MAX_DEPTH})")));
                }
                stack.push(Element::open(&tag).map_err(fail)?);
            }
            Event::Empty(tag) => {
                if root.is_some() && stack.is_empty() {
                    return Err(fail("multiple root elements".to_string()));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(fail(format!("nesting too deep (limit {MAX_DEPTH})")));
                }
                let element = Element::open(&tag).map_err(fail)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => match stack.pop() {
                Some(element) => close(element, &mut stack, &mut root),
                None => return Err(fail("closing tag without matching opening tag".to_string())),
            },
            Event::Text(content) => {
                let unescaped = content.unescape().map_err(|err| fail(err.to_string()))?;
                push_text(&mut stack, &unescaped).map_err(fail)?;
            }
            Event::CData(content) => {
                push_text(&mut stack, &String::from_utf8_lossy(&content)).map_err(fail)?;
            }
            Event::Eof => break,
            // Comments, declarations, processing instructions, DOCTYPE.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::new(
            Format::Xml,
            format!("unclosed element <{}>", open.name),
        )
        .at(Position::from_offset(text, text.len())));
    }
    let root = root.ok_or_else(|| ParseError::new(Format::Xml, "document has no root element"))?;
    Ok(XmlDocument {
        root: root.name.clone(),
        value: root.into_value(),
    })
}

/// Serialize a value as an XML document under a `root` element.
pub fn serialize(value: &Value, root: &str) -> Result<String, SerializeError> {
    check_name(root, "")?;
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    match value {
        Value::Array(items) => {
            out.push_str(&format!("<{root}>\n"));
            for (i, item) in items.iter().enumerate() {
                let path = child_path("", &i.to_string());
                reject_nested_array(item, &path)?;
                write_element(&mut out, ITEM_ELEMENT, item, 1, &path)?;
            }
            out.push_str(&format!("</{root}>\n"));
        }
        _ => write_element(&mut out, root, value, 0, "")?,
    }
    Ok(out)
}

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(tag: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(|err| err.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(text.to_string());
        }

        let mut map = Map::new();
        for (key, value) in self.attributes {
            map.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::String(value));
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        for child in self.children {
            let name = child.name.clone();
            let value = child.into_value();
            match map.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::take(existing);
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name, value);
                }
            }
        }
        Value::Object(map)
    }
}

fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside the root element".to_string()),
    }
}

fn write_element(
    out: &mut String,
    name: &str,
    value: &Value,
    depth: usize,
    path: &str,
) -> Result<(), SerializeError> {
    if depth >= MAX_DEPTH {
        return Err(SerializeError::new(
            Format::Xml,
            format!("nesting too deep (limit {MAX_DEPTH})"),
        )
        .at(path));
    }
    let indent = "  ".repeat(depth);
    match value {
        Value::Null => out.push_str(&format!("{indent}<{name}/>\n")),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = child_path(path, &i.to_string());
                reject_nested_array(item, &item_path)?;
                write_element(out, name, item, depth, &item_path)?;
            }
        }
        Value::Object(map) => {
            let mut attributes = String::new();
            let mut text = None;
            let mut children = Vec::new();
            for (key, child) in map {
                let child_at = child_path(path, key);
                if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    check_name(attr, &child_at)?;
                    let rendered = scalar_text(child).ok_or_else(|| {
                        SerializeError::new(
                            Format::Xml,
                            format!("attribute '{attr}' must be a scalar, found {}", child.kind()),
                        )
                        .at(child_at.as_str())
                    })?;
                    attributes.push_str(&format!(" {attr}=\"{}\"", escape(rendered.as_str())));
                } else if key == TEXT_KEY {
                    let rendered = scalar_text(child).ok_or_else(|| {
                        SerializeError::new(
                            Format::Xml,
                            format!("text content must be a scalar, found {}", child.kind()),
                        )
                        .at(child_at.as_str())
                    })?;
                    text = Some(rendered);
                } else {
                    check_name(key, &child_at)?;
                    children.push((key, child, child_at));
                }
            }

            if children.is_empty() {
                match text {
                    Some(text) => out.push_str(&format!(
                        "{indent}<{name}{attributes}>{}</{name}>\n",
                        escape(text.as_str())
                    )),
                    None => out.push_str(&format!("{indent}<{name}{attributes}/>\n")),
                }
                return Ok(());
            }

            out.push_str(&format!("{indent}<{name}{attributes}>\n"));
            if let Some(text) = text {
                out.push_str(&format!("{indent}  {}\n", escape(text.as_str())));
            }
            for (key, child, child_at) in children {
                write_element(out, key, child, depth + 1, &child_at)?;
            }
            out.push_str(&format!("{indent}</{name}>\n"));
        }
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape(text.as_str())));
        }
    }
    Ok(())
}

/// Repeated siblings carry one array; an inner array would merge into them.
fn reject_nested_array(item: &Value, path: &str) -> Result<(), SerializeError> {
    match item {
        Value::Array(_) => Err(SerializeError::new(
            Format::Xml,
            "an array inside an array has no XML representation",
        )
        .at(path)),
        _ => Ok(()),
    }
}

/// Text for a scalar value; `None` for arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// XML names start with a letter, `_` or `:` and continue with letters,
/// digits, `-`, `.`, `_` or `:`. Names starting with `xml` are not reserved
/// here.
fn check_name(name: &str, path: &str) -> Result<(), SerializeError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SerializeError::new(Format::Xml, format!("'{name}' is not a valid XML name")).at(path))
    }
}
