//! Show and status commands.

use anyhow::{Context, Result};

use crate::app::AppContext;

/// Print the current document and whether it is still the initial default.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn show(ctx: &AppContext) -> Result<()> {
    let document = ctx.config.current_document();
    let out = serde_json::json!({
        "initial_config": ctx.config.is_initial_config(),
        "document": document.as_ref(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serializing configuration")?
    );
    Ok(())
}

/// Print the workloads reported by the container runtime.
///
/// # Errors
///
/// Returns an error if the runtime cannot list workloads.
pub async fn status(ctx: &AppContext) -> Result<()> {
    let workloads = ctx.workloads.list_workloads().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&workloads).context("serializing workloads")?
    );
    Ok(())
}
