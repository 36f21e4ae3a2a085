//! Stable exit codes for docfence CLI commands.

/// Every file loaded; no invalid snippet (or strict mode off).
pub const OK: i32 = 0;
/// At least one file failed to load, or the run could not start.
pub const LOAD_FAILED: i32 = 1;
/// Strict mode and at least one snippet failed to parse.
pub const INVALID_SNIPPETS: i32 = 2;
