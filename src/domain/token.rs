//! Token classification: raw argv entry → semantic token.
//!
//! Classification knows nothing about any command schema, so the same
//! function serves every depth of subcommand resolution. It never fails;
//! whether a key is legal is decided by the resolver.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::instrument;

static SHORT_WITH_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([A-Za-z0-9_]+)=(.*)$").expect("valid short flag regex"));

static SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([A-Za-z0-9_]+)$").expect("valid short flag regex"));

/// One classified argv entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedToken {
    /// Flag name without dashes; the raw text for positionals
    pub key: String,
    /// Inline value from the `--key=value` / `-k=value` forms
    pub value: Option<String>,
    pub is_flag: bool,
    /// `--no-key`
    pub is_negation: bool,
    /// The bare `--` marker
    pub is_end_of_flags: bool,
    pub original: String,
}

impl ParsedToken {
    fn flag(raw: &str, key: &str, value: Option<&str>, is_negation: bool) -> Self {
        Self {
            key: key.to_string(),
            value: value.map(str::to_string),
            is_flag: true,
            is_negation,
            is_end_of_flags: false,
            original: raw.to_string(),
        }
    }

    fn positional(raw: &str) -> Self {
        Self {
            key: raw.to_string(),
            value: None,
            is_flag: false,
            is_negation: false,
            is_end_of_flags: false,
            original: raw.to_string(),
        }
    }

    fn end_of_flags(raw: &str) -> Self {
        Self {
            key: String::new(),
            value: None,
            is_flag: false,
            is_negation: false,
            is_end_of_flags: true,
            original: raw.to_string(),
        }
    }
}

/// Classify a raw argv entry; first matching rule wins.
#[instrument(level = "trace")]
pub fn classify(raw: &str) -> ParsedToken {
    if raw == "--" {
        return ParsedToken::end_of_flags(raw);
    }
    if let Some(key) = raw.strip_prefix("--no-") {
        return ParsedToken::flag(raw, key, None, true);
    }
    if let Some(body) = raw.strip_prefix("--") {
        return match body.split_once('=') {
            Some((key, value)) => ParsedToken::flag(raw, key, Some(value), false),
            None => ParsedToken::flag(raw, body, None, false),
        };
    }
    if let Some(caps) = SHORT_WITH_VALUE.captures(raw) {
        return ParsedToken::flag(raw, &caps[1], Some(&caps[2]), false);
    }
    if let Some(caps) = SHORT.captures(raw) {
        return ParsedToken::flag(raw, &caps[1], None, false);
    }
    ParsedToken::positional(raw)
}
