//! Restricted JSON objects from the command line.
//!
//! Strict JSON is tried first. Otherwise the text is treated as a relaxed
//! object literal (single quotes, bare keys, trailing commas) and rewritten
//! into JSON textually. Nothing is ever evaluated.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value as JsonValue};

use crate::domain::error::ValueError;

static FORBIDDEN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(function|class|new|return|eval|this|global|process|require|import|export|window)\b",
    )
    .expect("valid forbidden token regex")
});

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)\s*:").expect("valid bare key regex")
});

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));

/// Keys that would reach an object's prototype in a JavaScript consumer.
pub const DANGEROUS_KEYS: [&str; 3] = ["__proto__", "prototype", "constructor"];

/// Parse a plain JSON object, rejecting arrays, null and scalars.
pub fn parse_object(raw: &str) -> Result<Map<String, JsonValue>, ValueError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValueError::Empty);
    }

    let parsed = match serde_json::from_str::<JsonValue>(text) {
        Ok(value) => value,
        Err(_) => {
            let normalized = normalize_literal(text)?;
            serde_json::from_str(&normalized)
                .map_err(|e| ValueError::Rejected(format!("not a valid object literal: {}", e)))?
        }
    };

    let object = match parsed {
        JsonValue::Object(map) => map,
        JsonValue::Array(_) => {
            return Err(ValueError::Rejected("expected an object, got an array".into()))
        }
        JsonValue::Null => return Err(ValueError::Rejected("expected an object, got null".into())),
        _ => return Err(ValueError::Rejected("expected an object".into())),
    };

    sanitize_object(&object)?;
    Ok(object)
}

/// Rewrite a relaxed object literal into JSON text.
fn normalize_literal(text: &str) -> Result<String, ValueError> {
    if let Some(m) = FORBIDDEN_TOKEN.find(text) {
        return Err(ValueError::Rejected(format!(
            "forbidden token '{}'",
            m.as_str()
        )));
    }
    let quoted = text.replace('\'', "\"");
    let keyed = BARE_KEY.replace_all(&quoted, "${1}\"${2}\":");
    let trimmed = TRAILING_COMMA.replace_all(&keyed, "${1}");
    Ok(trimmed.into_owned())
}

fn sanitize_object(object: &Map<String, JsonValue>) -> Result<(), ValueError> {
    for (key, value) in object {
        if DANGEROUS_KEYS.contains(&key.as_str()) {
            return Err(ValueError::Rejected(format!("forbidden key '{}'", key)));
        }
        sanitize_value(value)?;
    }
    Ok(())
}

fn sanitize_value(value: &JsonValue) -> Result<(), ValueError> {
    match value {
        JsonValue::Object(map) => sanitize_object(map),
        JsonValue::Array(items) => items.iter().try_for_each(sanitize_value),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_relaxed_literal_when_normalizing_then_produces_json() {
        let out = normalize_literal("{a: 'x', b: [1, 2,],}").unwrap();
        assert_eq!(out, r#"{"a": "x", "b": [1, 2]}"#);
    }

    #[test]
    fn given_nested_proto_key_then_rejected() {
        let result = parse_object(r#"{"a": {"b": [{"__proto__": 1}]}}"#);
        assert!(matches!(result, Err(ValueError::Rejected(_))));
    }
}
