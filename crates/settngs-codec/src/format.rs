//! Document codecs
//!
//! Each codec turns raw bytes into a [`Document`] and back. JSON is the
//! canonical format; TOML is offered for hosts that prefer it. The format of
//! a settings file is picked from its extension.

use crate::{Document, Error, Result};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Key of the single-entry object standing in for a TOML datetime.
///
/// Datetimes have no JSON counterpart, so [`TomlCodec`] decodes them as
/// `{"$__toml_datetime": "<RFC 3339 text>"}` and encodes that shape back as
/// a datetime. Through [`JsonCodec`] the object is kept as is.
pub const DATETIME_KEY: &str = "$__toml_datetime";

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Detect the format from a file extension:
    /// - `.json` -> JSON
    /// - `.toml` -> TOML
    pub fn from_path(path: &Path) -> Result<Format> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// The codec implementing this format
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Format::Json => &JsonCodec,
            Format::Toml => &TomlCodec,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Toml => f.write_str("TOML"),
        }
    }
}

/// Encode/decode boundary between the settings core and stored bytes.
///
/// A zero-length (or whitespace-only) input decodes to an empty document so
/// that a freshly created settings file behaves like a missing one.
pub trait Codec {
    fn format(&self) -> Format;

    /// Decode stored bytes into a document
    fn decode(&self, bytes: &[u8]) -> Result<Document>;

    /// Encode a document into bytes ready to be written
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;
}

/// Pretty-printed JSON with two-space indentation and a trailing newline
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        let value: Value = serde_json::from_slice(bytes).map_err(|e| Error::Decode {
            format: Format::Json,
            message: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::NotADocument {
                found: shape(&other),
            }),
        }
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(|e| Error::Encode {
            format: Format::Json,
            message: e.to_string(),
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// TOML documents; groups become tables.
///
/// TOML has no null, so encoding a document holding one fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::Decode {
            format: Format::Toml,
            message: format!("Invalid UTF-8: {}", e),
        })?;

        let table: toml::Table = toml::from_str(text).map_err(|e| Error::Decode {
            format: Format::Toml,
            message: e.to_string(),
        })?;

        Ok(table
            .into_iter()
            .map(|(key, value)| (key, toml_to_json(value)))
            .collect())
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let table = document
            .iter()
            .map(|(key, value)| Ok((key.clone(), json_to_toml(value)?)))
            .collect::<Result<toml::Table>>()?;

        toml::to_string_pretty(&table)
            .map(String::into_bytes)
            .map_err(|e| Error::Encode {
                format: Format::Toml,
                message: e.to_string(),
            })
    }
}

/// Convert a TOML value to its JSON equivalent
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => {
            let mut marker = serde_json::Map::new();
            marker.insert(DATETIME_KEY.to_string(), Value::String(dt.to_string()));
            Value::Object(marker)
        }
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON value to its TOML equivalent
fn json_to_toml(value: &Value) -> Result<toml::Value> {
    let unsupported = |message: String| Error::Encode {
        format: Format::Toml,
        message,
    };

    Ok(match value {
        Value::Null => return Err(unsupported("TOML has no null value".to_string())),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) if n.is_f64() => toml::Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => return Err(unsupported(format!("Integer {} is out of range", n))),
        },
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(arr) => toml::Value::Array(arr.iter().map(json_to_toml).collect::<Result<_>>()?),
        Value::Object(obj) => match datetime(obj) {
            Some(dt) => toml::Value::Datetime(dt),
            None => toml::Value::Table(
                obj.iter()
                    .map(|(k, v)| Ok((k.clone(), json_to_toml(v)?)))
                    .collect::<Result<_>>()?,
            ),
        },
    })
}

/// The datetime held by a [`DATETIME_KEY`] object, if `obj` is one
fn datetime(obj: &serde_json::Map<String, Value>) -> Option<toml::value::Datetime> {
    if obj.len() != 1 {
        return None;
    }
    obj.get(DATETIME_KEY)?.as_str()?.parse().ok()
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
