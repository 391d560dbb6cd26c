//! `dominos config show|edit|validate|setup`.

use std::io::{BufRead, Write};

use anyhow::Context;

use crate::core::redact::masked_document;
use crate::core::validator::validate_document;
use crate::error::CliError;
use crate::io::config_store::ConfigStore;
use crate::io::editor::EditorCommand;
use crate::io::prompt::Prompter;
use crate::provider::OrderingProvider;
use crate::setup::run_setup;

/// Print the stored document with the card number masked.
pub fn show<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    store: &ConfigStore,
) -> Result<(), CliError> {
    let raw = store.load_raw()?.ok_or(CliError::ConfigMissing)?;
    let rendered =
        serde_json::to_string_pretty(&masked_document(&raw)).context("render configuration")?;
    prompter.say("Configuration:")?;
    prompter.say(rendered)?;
    prompter.say("")?;
    prompter.say(format!("Location: {}", store.location().display()))
}

/// Open the document in `editor` and wait for it to exit.
pub fn edit<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    store: &ConfigStore,
    editor: &EditorCommand,
) -> Result<(), CliError> {
    if !store.exists() {
        return Err(CliError::ConfigMissing);
    }
    prompter.say(format!("Opening config in {}...", editor.display()))?;
    editor.open(store.location())?;
    prompter.say("✓ Config file closed")
}

/// Report validator defects. An absent document is itself a defect.
pub fn validate<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    store: &ConfigStore,
) -> Result<(), CliError> {
    let defects = match store.load_raw()? {
        Some(raw) => validate_document(&raw),
        None => vec!["No configuration found".to_string()],
    };
    if !defects.is_empty() {
        return Err(CliError::ValidationFailed { defects });
    }
    prompter.say("✓ Configuration is valid")
}

/// Run the setup wizard and overwrite any stored document.
pub async fn setup<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
    store: &ConfigStore,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    run_setup(prompter, provider, store).await.map(|_| ())
}
