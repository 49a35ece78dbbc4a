//! Apply command: feeds one desired-state document to the configuration manager.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use edge_models::DesiredStateDocument;

use crate::app::AppContext;
use crate::application::services::configuration::UpdateOutcome;

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Path to a desired-state JSON document
    pub file: PathBuf,
}

/// Read and parse a desired-state JSON document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid document.
pub fn read_document(path: &Path) -> Result<DesiredStateDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

/// Entry point for `edge-agent apply`.
///
/// # Errors
///
/// Returns an error if the document cannot be read or is rejected.
pub async fn run(ctx: &AppContext, args: &ApplyArgs) -> Result<()> {
    let document = read_document(&args.file)?;
    let version = document.version.clone();
    match ctx.config.update(document).await? {
        UpdateOutcome::Applied => println!("applied configuration version '{version}'"),
        UpdateOutcome::Unchanged => println!("configuration unchanged"),
    }
    Ok(())
}
