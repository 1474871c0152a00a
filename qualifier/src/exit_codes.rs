//! Stable exit codes for qualifier CLI commands.

/// Every envelope was a success. A `false` answer still counts as success.
pub const OK: i32 = 0;
/// Invalid config or input, or at least one envelope carried an error.
pub const INVALID: i32 = 1;
