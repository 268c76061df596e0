//! Exit codes of the `argtree` binary, taken from BSD sysexits.h

/// argv did not resolve or a handler rejected a value: unknown option,
/// missing value, bad coercion
pub const USAGE: i32 = 64;

/// A handler failed, or the binary's own command tree is malformed
pub const SOFTWARE: i32 = 70;

/// Settings file or `ARGTREE_*` variables could not be loaded
pub const CONFIG: i32 = 78;
