//! Resolve and dispatch to the matched command's handler.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::application::diagnostic::Diagnostic;
use crate::application::resolve::{resolve, Outcome};
use crate::domain::{CommandId, CommandTree, HandlerError};

/// What a run ended with when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The handler of `command` ran and returned `Ok`.
    Executed { command: CommandId },
    /// Render help for `command`.
    Help { command: CommandId },
    /// Print the version.
    Version(Option<String>),
}

/// Failure of a run, tagged with where it came from.
#[derive(Error, Debug)]
pub enum RunError {
    /// Raised by the engine: report as a plain diagnostic.
    #[error(transparent)]
    Engine(#[from] Diagnostic),

    /// Raised inside a handler: the original error is kept intact.
    #[error("command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: HandlerError,
    },
}

impl RunError {
    pub fn is_engine(&self) -> bool {
        matches!(self, RunError::Engine(_))
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            RunError::Engine(d) => Some(d),
            RunError::Handler { .. } => None,
        }
    }
}

/// Resolve `argv` against `tree` and invoke the matched handler once.
#[instrument(level = "debug", skip_all)]
pub fn run<S: AsRef<str>>(tree: &CommandTree, argv: &[S]) -> Result<RunOutcome, RunError> {
    match resolve(tree, argv)? {
        Outcome::Matched { command, bindings } => {
            let Some(handler) = tree[command].handler() else {
                return Ok(RunOutcome::Help { command });
            };
            debug!(command = %tree.display_path(command), "invoking handler");
            handler(&bindings).map_err(|source| RunError::Handler {
                command: tree.display_path(command),
                source,
            })?;
            Ok(RunOutcome::Executed { command })
        }
        Outcome::Help { command } => Ok(RunOutcome::Help { command }),
        Outcome::Version(version) => Ok(RunOutcome::Version(version)),
    }
}
