//! Value coercion: raw string + declared kind → typed value.

use std::collections::BTreeSet;

use itertools::Itertools;
use thiserror::Error;
use tracing::instrument;

use crate::domain::byte_size::ByteSize;
use crate::domain::duration::Duration;
use crate::domain::error::ValueError;
use crate::domain::fs_path::FsPath;
use crate::domain::json;
use crate::domain::kind::{ScalarKind, ValueKind};
use crate::domain::value::Value;

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
const FALSY: [&str; 4] = ["false", "0", "no", "off"];

/// A raw string could not be converted to the declared kind.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {kind} value '{raw}': {reason}")]
pub struct CoercionError {
    pub kind: ValueKind,
    pub raw: String,
    pub reason: String,
    /// Other kinds the raw text would have parsed as
    pub inferred: Vec<ScalarKind>,
    /// Valid choices, or example inputs for the kind
    pub expected: Vec<String>,
}

impl CoercionError {
    fn new(kind: ValueKind, raw: &str, reason: impl Into<String>, choices: &BTreeSet<String>) -> Self {
        let expected = if kind.needs_choices() {
            choices.iter().cloned().collect()
        } else {
            kind.element().examples().iter().map(|s| s.to_string()).collect()
        };
        Self {
            kind,
            raw: raw.to_string(),
            reason: reason.into(),
            inferred: infer_kinds(raw),
            expected,
        }
    }
}

/// Coerce `raw` per `kind`. `choices` is consulted only for choice kinds.
#[instrument(level = "trace", skip(choices))]
pub fn coerce(kind: ValueKind, raw: &str, choices: &BTreeSet<String>) -> Result<Value, CoercionError> {
    match kind {
        ValueKind::Scalar(scalar) => coerce_scalar(scalar, raw, choices)
            .map_err(|reason| CoercionError::new(kind, raw, reason, choices)),
        ValueKind::Array(scalar) => coerce_array(scalar, raw, choices)
            .map_err(|reason| CoercionError::new(kind, raw, reason, choices)),
    }
}

fn coerce_scalar(kind: ScalarKind, raw: &str, choices: &BTreeSet<String>) -> Result<Value, String> {
    match kind {
        ScalarKind::Boolean => parse_bool(raw).map(Value::Bool),
        ScalarKind::String => Ok(Value::String(raw.to_string())),
        ScalarKind::Number => parse_number(raw).map(Value::Number),
        ScalarKind::Choice => {
            let candidate = raw.trim();
            if choices.contains(candidate) {
                Ok(Value::Choice(candidate.to_string()))
            } else {
                Err(format!("expected one of {}", choices.iter().join(", ")))
            }
        }
        ScalarKind::Path => FsPath::parse(raw).map(Value::Path).map_err(reason),
        ScalarKind::Time => Duration::parse(raw).map(Value::Time).map_err(reason),
        ScalarKind::Size => ByteSize::parse(raw).map(Value::Size).map_err(reason),
        ScalarKind::Json => json::parse_object(raw).map(Value::Json).map_err(reason),
    }
}

fn coerce_array(kind: ScalarKind, raw: &str, choices: &BTreeSet<String>) -> Result<Value, String> {
    split_elements(raw)?
        .into_iter()
        .map(|element| {
            coerce_scalar(kind, element, choices)
                .map_err(|why| format!("element '{}': {}", element, why))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Split `a, b,c` or `[a, b, c]` into trimmed, non-empty elements.
pub fn split_elements(raw: &str) -> Result<Vec<&str>, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("empty list".to_string());
    }
    let inner = text
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(text);
    Ok(inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn parse_bool(raw: &str) -> Result<bool, String> {
    let lowered = raw.trim().to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err("expected true/false, yes/no, on/off or 1/0".to_string())
    }
}

pub fn parse_number(raw: &str) -> Result<f64, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("empty input".to_string());
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err("not a number".to_string()),
    }
}

/// Kinds with a real grammar that `raw` satisfies.
pub fn infer_kinds(raw: &str) -> Vec<ScalarKind> {
    let mut kinds = Vec::new();
    if parse_bool(raw).is_ok() {
        kinds.push(ScalarKind::Boolean);
    }
    if parse_number(raw).is_ok() {
        kinds.push(ScalarKind::Number);
    }
    if Duration::is_valid(raw) {
        kinds.push(ScalarKind::Time);
    }
    if ByteSize::is_valid(raw) {
        kinds.push(ScalarKind::Size);
    }
    if json::parse_object(raw).is_ok() {
        kinds.push(ScalarKind::Json);
    }
    kinds
}

fn reason(e: ValueError) -> String {
    e.to_string()
}
