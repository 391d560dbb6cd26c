//! Deterministic, pure logic shared by the commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod address;
pub mod builder;
pub mod input_rules;
pub mod redact;
pub mod types;
pub mod validator;
