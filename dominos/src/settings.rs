//! Application settings captured once from flags and the environment.
//!
//! Commands never read environment variables themselves; `main` builds a
//! [`Settings`] and passes the relevant parts down.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::io::config_store::ConfigStore;
use crate::io::editor::EditorCommand;

pub const DEFAULT_ORDER_API: &str = "https://order.dominos.com/power";
pub const DEFAULT_TRACKER_API: &str = "https://tracker.dominos.com/tracker-presentation-service/v2";

/// Endpoints for the HTTP ordering provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub order_api: String,
    pub tracker_api: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            order_api: DEFAULT_ORDER_API.to_string(),
            tracker_api: DEFAULT_TRACKER_API.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub editor: EditorCommand,
    pub provider: ProviderSettings,
}

impl Settings {
    /// Resolve settings. `config_dir` comes from `--config-dir`/`DOMINOS_CONFIG_DIR`
    /// when given, else the per-user config directory.
    pub fn resolve(
        config_dir: Option<PathBuf>,
        editor: Option<&str>,
        visual: Option<&str>,
        provider: ProviderSettings,
    ) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        Ok(Self {
            config_dir,
            editor: EditorCommand::resolve(editor, visual),
            provider,
        })
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::in_dir(&self.config_dir)
    }
}

fn default_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("dominos"))
        .ok_or_else(|| anyhow!("cannot determine the user config directory (use --config-dir)"))
}
