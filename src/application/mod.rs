//! Application layer: resolution engine and handler dispatch
//!
//! Consumes the declared command tree and a normalized argv.

pub mod diagnostic;
pub mod resolve;
pub mod run;

pub use diagnostic::{Diagnostic, HintPolicy, ResolveError, Slot};
pub use resolve::{resolve, Outcome};
pub use run::{run, RunError, RunOutcome};
