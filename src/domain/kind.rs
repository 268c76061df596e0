//! Value kinds: the closed set of types a positional or option can declare.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scalar value kinds. Every kind also has an array variant, see [`ValueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Boolean,
    String,
    Number,
    Choice,
    Path,
    /// Duration in milliseconds (`1h30m`, or a date relative to now)
    Time,
    /// Byte size (`10kb`, base 1024)
    Size,
    /// Restricted JSON object
    Json,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 8] = [
        ScalarKind::Boolean,
        ScalarKind::String,
        ScalarKind::Number,
        ScalarKind::Choice,
        ScalarKind::Path,
        ScalarKind::Time,
        ScalarKind::Size,
        ScalarKind::Json,
    ];

    /// The array variant of this kind.
    pub fn array(self) -> ValueKind {
        ValueKind::Array(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Choice => "choice",
            ScalarKind::Path => "path",
            ScalarKind::Time => "time",
            ScalarKind::Size => "size",
            ScalarKind::Json => "json",
        }
    }

    /// Example inputs shown to the user when coercion fails.
    pub fn examples(self) -> &'static [&'static str] {
        match self {
            ScalarKind::Boolean => &["true", "false", "yes", "no", "1", "0"],
            ScalarKind::String => &["hello"],
            ScalarKind::Number => &["42", "-3.5", "1e3"],
            ScalarKind::Choice => &[],
            ScalarKind::Path => &["./src", "/tmp/out.log", "~/notes.md"],
            ScalarKind::Time => &["500ms", "30s", "1h30m", "2w", "2030-01-01"],
            ScalarKind::Size => &["512b", "10kb", "1.5mb", "2gb"],
            ScalarKind::Json => &[r#"{"a": 1}"#, "{a: 1, b: 'x'}"],
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a positional or option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Scalar(ScalarKind::Boolean)
    }
}

impl From<ScalarKind> for ValueKind {
    fn from(kind: ScalarKind) -> Self {
        ValueKind::Scalar(kind)
    }
}

impl ValueKind {
    /// Element kind: the kind itself for scalars, the item kind for arrays.
    pub fn element(self) -> ScalarKind {
        match self {
            ValueKind::Scalar(k) | ValueKind::Array(k) => k,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, ValueKind::Array(_))
    }

    pub fn is_boolean(self) -> bool {
        self == ValueKind::Scalar(ScalarKind::Boolean)
    }

    pub fn needs_choices(self) -> bool {
        self.element() == ScalarKind::Choice
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(k) => write!(f, "{}", k),
            ValueKind::Array(k) => write!(f, "{}Array", k),
        }
    }
}

/// Error parsing a kind name such as `numberArray`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ScalarKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_suffix("Array") {
            Some(element) => element
                .parse::<ScalarKind>()
                .map(ValueKind::Array)
                .map_err(|_| UnknownKind(s.to_string())),
            None => s.parse::<ScalarKind>().map(ValueKind::Scalar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_array_kind_name_when_parsing_then_returns_array_variant() {
        let kind: ValueKind = "numberArray".parse().unwrap();
        assert_eq!(kind, ScalarKind::Number.array());
        assert_eq!(kind.to_string(), "numberArray");
    }

    #[test]
    fn given_unknown_name_when_parsing_then_errors() {
        assert!("float".parse::<ValueKind>().is_err());
        assert!("floatArray".parse::<ValueKind>().is_err());
    }

    #[test]
    fn given_default_kind_then_is_boolean() {
        assert!(ValueKind::default().is_boolean());
    }
}
