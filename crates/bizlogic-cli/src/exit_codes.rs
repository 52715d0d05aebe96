//! Stable exit codes for `bizlogic-cli`.

/// The call returned, was skipped, or every matching rule ran.
pub const OK: i32 = 0;
/// A hook failed or a rule halted on a failure.
pub const FAILED: i32 = 1;
/// Dispatch, configuration or input error; nothing meaningful ran.
pub const INVALID: i32 = 2;
