//! Infrastructure implementation of the `ConfigStateStore` port.
//!
//! `JsonConfigStore` persists the desired-state document as pretty JSON at
//! `<data_dir>/device-config.json`, using `tokio::task::spawn_blocking` and an
//! atomic write (temp file + rename) so a crash never leaves a torn file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use edge_models::DesiredStateDocument;

use crate::application::ports::ConfigStateStore;

/// Name of the persisted configuration file inside the data directory.
pub const DEVICE_CONFIG_FILE: &str = "device-config.json";

/// Owner read/write only.
const CONFIG_FILE_MODE: u32 = 0o600;

/// Device config file store: implements `ConfigStateStore` for the infra layer.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Store for `<data_dir>/device-config.json`.
    #[must_use]
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(DEVICE_CONFIG_FILE))
    }

    /// Store with an explicit file path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Synchronous load: used internally by `load` via `spawn_blocking`.
    fn load_sync(path: &Path) -> Result<Option<DesiredStateDocument>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading device config {}", path.display()))?;
        let document = serde_json::from_str(&content)
            .with_context(|| format!("parsing device config {}", path.display()))?;
        Ok(Some(document))
    }

    /// Synchronous save: used internally by `save` via `spawn_blocking`.
    fn save_sync(path: &Path, document: &DesiredStateDocument) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(document).context("serializing device config")?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = create_private(&temp_path)?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        drop(file);

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing device config {}", path.display()))?;
        Ok(())
    }
}

/// Create (or truncate) `path` with owner-only permissions before any content
/// is written to it.
fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }
    let file = options
        .open(path)
        .with_context(|| format!("creating temp file {}", path.display()))?;

    // A leftover file from an earlier crash keeps its old mode through `open`.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(CONFIG_FILE_MODE))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    Ok(file)
}

#[async_trait]
impl ConfigStateStore for JsonConfigStore {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<DesiredStateDocument>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("device config load task panicked")?
    }

    async fn save(&self, document: &DesiredStateDocument) -> Result<()> {
        let path = self.path.clone();
        let document = document.clone();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &document))
            .await
            .context("device config save task panicked")?
    }

    async fn remove(&self) -> Result<()> {
        tokio::fs::remove_file(&self.path)
            .await
            .with_context(|| format!("removing device config {}", self.path.display()))
    }
}
