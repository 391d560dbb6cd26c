//! Order pizza from saved presets and track the delivery.
//!
//! A single configuration document holds the customer, payment and store
//! details plus named order presets. The crate is layered:
//!
//! - **[`core`]**: Pure, deterministic logic (document types, validation,
//!   order building, input rules). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config file, terminal prompts,
//!   external editor, spinners). Isolated to enable in-memory tests.
//! - **[`provider`]**: The ordering backend behind the [`provider::OrderingProvider`]
//!   trait, with an HTTP implementation.
//!
//! Orchestration modules ([`order`], [`setup`], [`track`], [`config_cmd`])
//! coordinate core logic with I/O to implement CLI commands.

pub mod config_cmd;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod order;
pub mod provider;
pub mod settings;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod track;
