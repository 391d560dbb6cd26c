//! Command errors, exit codes and remediation hints.

use std::fmt;

use thiserror::Error;

use crate::core::builder::PresetNotFound;
use crate::exit_codes;

/// Provider call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStage {
    StoreLookup,
    Validate,
    Price,
    Place,
    Track,
}

impl fmt::Display for ProviderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderStage::StoreLookup => "store lookup",
            ProviderStage::Validate => "validation",
            ProviderStage::Price => "pricing",
            ProviderStage::Place => "placement",
            ProviderStage::Track => "tracking",
        };
        f.write_str(label)
    }
}

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No configuration found")]
    ConfigMissing,

    #[error("Configuration has errors:\n{}", bullet_list(.defects))]
    ConfigInvalid { defects: Vec<String> },

    /// Same defects as [`CliError::ConfigInvalid`], raised by
    /// `config validate` itself, so the hint points at fixing the file.
    #[error("Configuration has errors:\n{}", bullet_list(.defects))]
    ValidationFailed { defects: Vec<String> },

    #[error(transparent)]
    PresetNotFound(#[from] PresetNotFound),

    /// Provider message, passed through verbatim.
    #[error("{message}")]
    Provider {
        stage: ProviderStage,
        message: String,
    },

    #[error("Setup cancelled")]
    UserCancelled,

    #[error("Error opening editor '{editor}': {reason}")]
    EditorFailure { editor: String, reason: String },

    #[error("No phone number provided and none in config")]
    NoPhone,

    #[error("{0:#}")]
    Input(anyhow::Error),

    #[error("{0:#}")]
    Storage(#[from] anyhow::Error),
}

impl CliError {
    pub fn provider(stage: ProviderStage, err: impl fmt::Display) -> Self {
        CliError::Provider {
            stage,
            message: err.to_string(),
        }
    }

    /// Stable process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Provider { .. } => exit_codes::PROVIDER_FAILURE,
            _ => exit_codes::CONFIG_ERROR,
        }
    }

    /// Suggested next step, printed after the error.
    pub fn hint(&self) -> Option<String> {
        let hint = match self {
            CliError::ConfigMissing => "Run: dominos config setup".to_string(),
            CliError::ConfigInvalid { .. } => "Run: dominos config validate".to_string(),
            CliError::ValidationFailed { .. } => "Fix it with:\n  dominos config edit".to_string(),
            CliError::PresetNotFound(err) if err.available.is_empty() => {
                "No presets configured. Add one with:\n  dominos config edit".to_string()
            }
            CliError::PresetNotFound(err) => {
                let mut lines = vec!["Available presets:".to_string()];
                lines.extend(
                    err.available
                        .iter()
                        .map(|(key, name)| format!("  • {key} - {name}")),
                );
                lines.join("\n")
            }
            CliError::Provider {
                stage: ProviderStage::Place,
                message,
            } if message.contains("payment") => {
                "Check your payment information:\n  dominos config edit".to_string()
            }
            CliError::Provider {
                stage: ProviderStage::Track,
                ..
            } => "Try:\n  dominos track [phone-number]".to_string(),
            CliError::Provider {
                stage: ProviderStage::StoreLookup,
                ..
            } => "Check the delivery address and run: dominos config setup".to_string(),
            CliError::NoPhone => "Usage: dominos track [phone]".to_string(),
            _ => return None,
        };
        Some(hint)
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  • {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
