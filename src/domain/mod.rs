//! Domain layer: schema, tokens, value types and coercion
//!
//! This layer is independent of presentation and configuration. The only I/O
//! is the on-demand filesystem queries of [`FsPath`].

pub mod byte_size;
pub mod coerce;
pub mod command;
pub mod duration;
pub mod error;
pub mod fs_path;
pub mod json;
pub mod kind;
pub mod token;
pub mod tree;
pub mod value;

pub use byte_size::ByteSize;
pub use coerce::{coerce, CoercionError};
pub use command::{
    ArgumentDef, Bindings, CommandNode, Definition, Handler, HandlerError, OptionDef,
    RESERVED_FLAGS,
};
pub use duration::Duration;
pub use error::{DefinitionKind, SchemaError, SchemaResult, ValueError};
pub use fs_path::FsPath;
pub use kind::{ScalarKind, ValueKind};
pub use token::{classify, ParsedToken};
pub use tree::{CommandBuilder, CommandId, CommandTree};
pub use value::Value;
