//! I/O helpers for CLI commands.

pub mod config_store;
pub mod editor;
pub mod progress;
pub mod prompt;
