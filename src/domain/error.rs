//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Construction-time schema errors. Raised while the CLI author declares
/// commands; never recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate {what} '{name}' on command '{command}'")]
    DuplicateDefinition {
        command: String,
        what: DefinitionKind,
        name: String,
    },

    #[error("required argument '{argument}' declared after optional argument '{after}' on command '{command}'")]
    OrderingViolation {
        command: String,
        argument: String,
        after: String,
    },

    #[error("handler already set on command '{command}'")]
    HandlerAlreadySet { command: String },

    #[error("choice {what} '{name}' on command '{command}' declares no choices")]
    EmptyChoices {
        command: String,
        what: DefinitionKind,
        name: String,
    },

    #[error("'{name}' is reserved and cannot be declared on command '{command}'")]
    ReservedName { command: String, name: String },

    #[error("invalid default '{raw}' for {what} '{name}' on command '{command}': {reason}")]
    InvalidDefault {
        command: String,
        what: DefinitionKind,
        name: String,
        raw: String,
        reason: String,
    },
}

/// Which table a definition lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Argument,
    Option,
    Subcommand,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionKind::Argument => f.write_str("argument"),
            DefinitionKind::Option => f.write_str("option"),
            DefinitionKind::Subcommand => f.write_str("subcommand"),
        }
    }
}

/// Result type for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Why a domain value type rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("empty input")]
    Empty,

    #[error("unrecognized format")]
    Format,

    #[error("missing unit")]
    MissingUnit,

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("value out of range")]
    OutOfRange,

    #[error("{0}")]
    Rejected(String),
}
