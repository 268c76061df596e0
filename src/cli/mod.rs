//! CLI layer: rendering and the self-hosted `argtree` binary

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod render;

pub use args::build_cli;
pub use commands::execute;
pub use error::{CliError, CliResult};
