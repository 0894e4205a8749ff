//! Setting kinds, typed values, and coercion rules

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

/// The closed set of kinds a setting can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKind {
    String,
    Integer,
    Float,
    Boolean,
    StringList,
}

impl SettingKind {
    /// Human readable name used in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Integer => "integer",
            SettingKind::Float => "float",
            SettingKind::Boolean => "boolean",
            SettingKind::StringList => "list of strings",
        }
    }

    /// Check whether an already typed value belongs to this kind.
    ///
    /// Floats must be finite, since a non-finite float has no JSON form.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (SettingKind::String, Value::String(_)) => true,
            (SettingKind::Integer, Value::Integer(_)) => true,
            (SettingKind::Float, Value::Float(v)) => v.is_finite(),
            (SettingKind::Boolean, Value::Boolean(_)) => true,
            (SettingKind::StringList, Value::List(_)) => true,
            _ => false,
        }
    }

    /// Coerce an untrusted JSON value (usually read from a settings file).
    ///
    /// Arrays and objects where a scalar is declared, and scalars or objects
    /// where a list is declared, are structural mismatches. Everything else
    /// that cannot be used is a soft rejection.
    pub fn coerce(self, raw: &Json) -> Result<Value, CoerceError> {
        match self {
            SettingKind::StringList => match raw {
                Json::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Json::String(s) => Ok(s.clone()),
                        other => Err(CoerceError::invalid(format!(
                            "list element {} is not a string",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                Json::Null => Err(CoerceError::invalid("null is not a list")),
                other => Err(self.mismatch(other)),
            },
            _ => match raw {
                Json::Array(_) | Json::Object(_) => Err(self.mismatch(raw)),
                Json::Null => Err(CoerceError::invalid(format!(
                    "null is not a valid {}",
                    self.as_str()
                ))),
                Json::String(s) => self.parse_str(s),
                Json::Bool(b) => match self {
                    SettingKind::Boolean => Ok(Value::Boolean(*b)),
                    _ => Err(self.wrong_scalar(raw)),
                },
                Json::Number(n) => match self {
                    SettingKind::Integer => n
                        .as_i64()
                        .or_else(|| {
                            n.as_f64().filter(|f| {
                                f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                            })
                            .map(|f| f as i64)
                        })
                        .map(Value::Integer)
                        .ok_or_else(|| CoerceError::invalid(format!("{} is not an integer", n))),
                    SettingKind::Float => n
                        .as_f64()
                        .filter(|f| f.is_finite())
                        .map(Value::Float)
                        .ok_or_else(|| CoerceError::invalid(format!("{} is not a float", n))),
                    _ => Err(self.wrong_scalar(raw)),
                },
            },
        }
    }

    /// Parse a single textual token (a command-line value or a string found
    /// where a scalar is declared).
    pub fn parse_str(self, token: &str) -> Result<Value, CoerceError> {
        match self {
            SettingKind::String => Ok(Value::String(token.to_string())),
            SettingKind::Integer => token
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| CoerceError::invalid(format!("{:?} is not an integer: {}", token, e))),
            SettingKind::Float => token
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(|| CoerceError::invalid(format!("{:?} is not a float", token))),
            SettingKind::Boolean => parse_bool(token)
                .map(Value::Boolean)
                .ok_or_else(|| CoerceError::invalid(format!("{:?} is not a boolean", token))),
            SettingKind::StringList => Ok(Value::List(vec![token.to_string()])),
        }
    }

    fn mismatch(self, found: &Json) -> CoerceError {
        CoerceError::Mismatch {
            expected: self,
            found: json_shape(found),
        }
    }

    fn wrong_scalar(self, found: &Json) -> CoerceError {
        CoerceError::invalid(format!("expected {}, found {}", self.as_str(), json_shape(found)))
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Short name for the shape of a JSON value
pub fn json_shape(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Why a raw value could not be used for a kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoerceError {
    /// The value has the wrong structure entirely (e.g. a list where a
    /// boolean is declared)
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: SettingKind,
        found: &'static str,
    },

    /// The value has a usable shape but its content is not valid
    #[error("{reason}")]
    Invalid { reason: String },
}

impl CoerceError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, CoerceError::Mismatch { .. })
    }
}

/// A strongly typed setting value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<String>),
}

impl Value {
    /// The kind this value naturally belongs to
    pub fn kind(&self) -> SettingKind {
        match self {
            Value::String(_) => SettingKind::String,
            Value::Integer(_) => SettingKind::Integer,
            Value::Float(_) => SettingKind::Float,
            Value::Boolean(_) => SettingKind::Boolean,
            Value::List(_) => SettingKind::StringList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to the document representation
    pub fn to_json(&self) -> Json {
        match self {
            Value::String(v) => Json::String(v.clone()),
            Value::Integer(v) => Json::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Boolean(v) => Json::Bool(*v),
            Value::List(v) => Json::Array(v.iter().cloned().map(Json::String).collect()),
        }
    }

    /// Textual tokens for this value, as they would appear on a command line
    pub fn to_tokens(&self) -> Vec<String> {
        match self {
            Value::List(items) => items.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::List(v) => write!(f, "[{}]", v.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::List(v.into_iter().map(String::from).collect())
    }
}
