//! Loads `AgentSettings` from `<config_dir>/agent.yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::AgentSettings;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "agent.yaml";

/// Path of the settings file for `config_dir`.
#[must_use]
pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE)
}

/// Read the settings file, returning defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings(config_dir: &Path) -> Result<AgentSettings> {
    let path = settings_path(config_dir);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(AgentSettings::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
