//! Stable exit codes for CLI commands.

/// Command succeeded, or the user cancelled cleanly.
pub const OK: i32 = 0;
/// Missing or invalid configuration, unknown preset, or other local errors.
pub const CONFIG_ERROR: i32 = 1;
/// An ordering provider call failed (store lookup, validate, price, place, track).
pub const PROVIDER_FAILURE: i32 = 2;
