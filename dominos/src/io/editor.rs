//! External editor launching for `config edit`.

use std::path::Path;
use std::process::Command;

use tracing::{debug, instrument, warn};

use crate::error::CliError;

/// Editor command line resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Resolve from `EDITOR`, then `VISUAL`, then the platform default.
    ///
    /// Values may carry arguments (`code --wait`).
    pub fn resolve(editor: Option<&str>, visual: Option<&str>) -> Self {
        let raw = [editor, visual]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(default_editor());
        Self::parse(raw)
    }

    fn parse(raw: &str) -> Self {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| default_editor().to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Editor as typed by the user, for display.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Open `path` and wait for the editor to exit. Stdio is inherited.
    #[instrument(skip(self), fields(editor = %self.program, path = %path.display()))]
    pub fn open(&self, path: &Path) -> Result<(), CliError> {
        debug!("launching editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|err| {
                warn!(err = %err, "failed to spawn editor");
                self.failure(err.to_string())
            })?;
        if !status.success() {
            warn!(exit_code = ?status.code(), "editor exited with failure");
            return Err(self.failure(format!("exited with status {status}")));
        }
        Ok(())
    }

    fn failure(&self, reason: String) -> CliError {
        CliError::EditorFailure {
            editor: self.display(),
            reason,
        }
    }
}

fn default_editor() -> &'static str {
    if cfg!(windows) { "notepad" } else { "vi" }
}
