//! Run command: long-running agent loop.
//!
//! Starts the reconciler and, when a desired-state file is given, pulls it on
//! every data-transfer interval. Exits cleanly on Ctrl-C.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::time::MissedTickBehavior;

use crate::app::AppContext;
use crate::application::services::configuration::UpdateOutcome;
use crate::application::services::reconciler;
use crate::commands::apply::read_document;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Desired-state JSON document to pull periodically
    #[arg(long)]
    pub desired: Option<PathBuf>,
}

/// Entry point for `edge-agent run`.
///
/// # Errors
///
/// Returns an error if the signal handler cannot be installed or the
/// reconciler task panics.
pub async fn run(ctx: &AppContext, args: &RunArgs) -> Result<()> {
    let handle = reconciler::spawn(ctx.workloads.clone(), ctx.settings.reconcile_interval());

    let result = match &args.desired {
        Some(path) => pull_until_shutdown(ctx, path).await,
        None => tokio::signal::ctrl_c()
            .await
            .context("failed to install Ctrl-C handler"),
    };
    tracing::info!("received shutdown signal");

    handle.stop().await?;
    result
}

async fn pull_until_shutdown(ctx: &AppContext, path: &Path) -> Result<()> {
    tick_until(
        ctx.config.data_transfer_interval(),
        tokio::signal::ctrl_c(),
        || pull_once(ctx, path),
    )
    .await
    .context("failed to install Ctrl-C handler")
}

/// Run `on_tick` every `period` until `shutdown` resolves.
///
/// `shutdown` is created once and polled first on every iteration, so a
/// signal that arrives while `on_tick` is running is seen as soon as it
/// returns.
///
/// # Errors
///
/// Returns the error `shutdown` resolves with.
pub async fn tick_until<S, T, F>(
    period: Duration,
    shutdown: S,
    mut on_tick: T,
) -> std::io::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
    T: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            signal = &mut shutdown => return signal,
            _ = ticker.tick() => on_tick().await,
        }
    }
}

async fn pull_once(ctx: &AppContext, path: &Path) {
    let document = match read_document(path) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "cannot read desired state");
            return;
        }
    };
    match ctx.config.update(document).await {
        Ok(UpdateOutcome::Applied) => {
            tracing::info!(version = %ctx.config.configuration_version(), "desired state applied");
        }
        Ok(UpdateOutcome::Unchanged) => {}
        Err(e) => {
            let e = anyhow::Error::from(e);
            tracing::error!(error = %format!("{e:#}"), "cannot apply desired state");
        }
    }
}
