//! CLI-level errors (wraps engine, schema and settings errors)

use thiserror::Error;

use crate::application::RunError;
use crate::config::SettingsError;
use crate::domain::{CoercionError, SchemaError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("invalid command declaration: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Settings(#[from] SettingsError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// A handler that rejects its input with a [`CoercionError`] reports a
    /// usage error, like the engine does.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Run(RunError::Engine(_)) => crate::exitcode::USAGE,
            CliError::Run(RunError::Handler { source, .. }) if source.is::<CoercionError>() => {
                crate::exitcode::USAGE
            }
            CliError::Run(RunError::Handler { .. }) => crate::exitcode::SOFTWARE,
            CliError::Schema(_) => crate::exitcode::SOFTWARE,
            CliError::Settings(_) => crate::exitcode::CONFIG,
        }
    }
}
