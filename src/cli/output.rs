//! Terminal output of the `argtree` binary
//!
//! Reports and help go to stdout; failures go to stderr. Colors follow the
//! `color` setting, see [`crate::config::ColorMode::apply`].

use colored::Colorize;

/// Print a non-engine failure with a red bold "error:" prefix to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print an already rendered diagnostic to stderr
pub fn diagnostic(text: &str) {
    eprint!("{}", text);
}

/// Print reports, help and version text to stdout
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
