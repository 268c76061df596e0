//! Typed values produced by coercion.

use std::fmt;

use itertools::Itertools;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::domain::byte_size::ByteSize;
use crate::domain::duration::Duration;
use crate::domain::fs_path::FsPath;

/// A coerced argument or option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Choice(String),
    Path(FsPath),
    Time(Duration),
    Size(ByteSize),
    Json(Map<String, JsonValue>),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String content of `String` and `Choice` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&FsPath> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Time(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<ByteSize> {
        match self {
            Value::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            Value::Json(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Canonical string form; coercing it again yields an equal value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) | Value::Choice(s) => f.write_str(s),
            Value::Path(p) => write!(f, "{}", p),
            Value::Time(d) => write!(f, "{}", d),
            Value::Size(s) => write!(f, "{}", s),
            Value::Json(m) => {
                let text = serde_json::to_string(m).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
            Value::Array(items) => write!(f, "[{}]", items.iter().join(",")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) | Value::Choice(s) => serializer.serialize_str(s),
            Value::Path(p) => serializer.serialize_str(p.raw()),
            Value::Time(d) => serializer.serialize_f64(d.millis()),
            Value::Size(s) => serializer.serialize_u64(s.bytes()),
            Value::Json(m) => m.serialize(serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
