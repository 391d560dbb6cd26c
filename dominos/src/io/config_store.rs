//! Configuration document storage (`<config dir>/config.json`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::types::ConfigDocument;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Single-document store keyed by a file path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at `dir`; the document lives at `dir/config.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Path shown to the user.
    pub fn location(&self) -> &Path {
        &self.path
    }

    /// True when a non-empty document has been persisted.
    ///
    /// A file that does not parse still counts so that `load` can surface the
    /// parse error instead of silently re-running setup over it.
    pub fn exists(&self) -> bool {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return false,
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => !map.is_empty(),
            Ok(Value::Null) => false,
            Ok(_) => true,
            Err(_) => !contents.trim().is_empty(),
        }
    }

    /// Raw document exactly as stored, or `None` when nothing is persisted.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load_raw(&self) -> Result<Option<Value>> {
        if !self.exists() {
            debug!("no configuration stored");
            return Ok(None);
        }
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(value))
    }

    /// Typed document, or `None` when nothing is persisted.
    ///
    /// No defaulting beyond the optional fields; run
    /// [`crate::core::validator::validate_document`] on [`Self::load_raw`]
    /// first to get readable defects for incomplete documents.
    pub fn load(&self) -> Result<Option<ConfigDocument>> {
        let Some(value) = self.load_raw()? else {
            return Ok(None);
        };
        let doc = serde_json::from_value(value)
            .with_context(|| format!("deserialize {}", self.path.display()))?;
        Ok(Some(doc))
    }

    /// Replace the stored document in full.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let mut buf = serde_json::to_string_pretty(doc).context("serialize config json")?;
        buf.push('\n');
        write_atomic(&self.path, &buf)?;
        debug!("configuration saved");
        Ok(())
    }
}

/// Write via temp file + rename so readers never see a partial document.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    restrict_permissions(&tmp_path)?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

/// The document holds card details in cleartext; keep it owner-only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
