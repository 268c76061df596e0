//! Resolution diagnostics: structured data, no rendering.

use thiserror::Error;

use crate::domain::CoercionError;

/// Where a missing value was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Argument,
    Option,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Argument => f.write_str("argument"),
            Slot::Option => f.write_str("option"),
        }
    }
}

/// Resolution-time failures. The first one hit in the scan wins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unknown option '{token}' for '{command}'")]
    UnknownOption {
        command: String,
        token: String,
        /// Declared canonical option names
        known: Vec<String>,
    },

    #[error("unexpected option '{token}' for '{command}'")]
    UnexpectedOption {
        command: String,
        token: String,
        /// Pending required argument the flag tried to displace
        pending: Option<String>,
    },

    #[error("unexpected argument '{token}' for '{command}'")]
    UnexpectedArgument {
        command: String,
        token: String,
        /// Number of positionals the command declares
        declared: usize,
    },

    #[error("option '--{option}' of '{command}' requires a value")]
    MissingOptionValue { command: String, option: String },

    #[error("missing required {slot} '{name}' for '{command}'")]
    MissingRequiredArgument {
        command: String,
        slot: Slot,
        name: String,
    },

    #[error("{slot} '{name}' of '{command}': {source}")]
    InvalidValue {
        command: String,
        slot: Slot,
        name: String,
        #[source]
        source: CoercionError,
    },
}

impl ResolveError {
    pub fn command(&self) -> &str {
        match self {
            ResolveError::UnknownOption { command, .. }
            | ResolveError::UnexpectedOption { command, .. }
            | ResolveError::UnexpectedArgument { command, .. }
            | ResolveError::MissingOptionValue { command, .. }
            | ResolveError::MissingRequiredArgument { command, .. }
            | ResolveError::InvalidValue { command, .. } => command,
        }
    }
}

/// What a presentation layer should suggest after the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPolicy {
    /// Point at `<command> --help`
    Help,
    /// Show example valid inputs for the value kind
    Examples,
    None,
}

/// A resolution failure plus what a renderer needs around it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct Diagnostic {
    pub error: ResolveError,
    /// e.g. `git remote add <name> <url>`
    pub usage: String,
    pub hint: HintPolicy,
}

impl Diagnostic {
    pub fn new(error: ResolveError, usage: String) -> Self {
        let hint = match &error {
            ResolveError::InvalidValue { .. } => HintPolicy::Examples,
            _ => HintPolicy::Help,
        };
        Self { error, usage, hint }
    }

    /// Example inputs for invalid values; empty otherwise.
    pub fn examples(&self) -> &[String] {
        match &self.error {
            ResolveError::InvalidValue { source, .. } => &source.expected,
            _ => &[],
        }
    }
}
