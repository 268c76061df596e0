//! Declarative command trees and a resolution engine for raw argv.
//!
//! Declare commands with typed positionals, options and subcommands on a
//! [`CommandTree`], then hand an already-normalized argument list to
//! [`resolve`] (bindings only) or [`run`] (bindings + handler dispatch).
//!
//! ```
//! use argtree::{ArgumentDef, CommandTree, OptionDef, ScalarKind, run};
//!
//! let mut tree = CommandTree::new("git");
//! tree.root_mut()
//!     .subcommand("remote")?
//!     .subcommand("add")?
//!     .argument("name", ArgumentDef::new(ScalarKind::String))?
//!     .argument("url", ArgumentDef::new(ScalarKind::String))?
//!     .option("fetch", OptionDef::flag().alias("f"))?
//!     .handler(|bindings| {
//!         assert_eq!(bindings.argument("name").and_then(|v| v.as_str()), Some("origin"));
//!         Ok(())
//!     })?;
//!
//! run(&tree, &["remote", "add", "origin", "https://example.com", "-f"])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{resolve, run, Diagnostic, Outcome, ResolveError, RunError, RunOutcome};
pub use domain::{
    ArgumentDef, Bindings, ByteSize, CommandId, CommandTree, Duration, FsPath, OptionDef,
    ScalarKind, SchemaError, Value, ValueKind,
};
