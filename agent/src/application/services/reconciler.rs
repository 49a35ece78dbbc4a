//! Background reconciliation loop.
//!
//! `spawn` starts the loop and returns a handle; `ReconcilerHandle::stop`
//! cancels it and waits for the task to exit.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ManifestRepository, WorkloadRuntime};
use crate::application::services::workload::WorkloadManager;

/// Handle to a running reconciliation loop.
pub struct ReconcilerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// Cancel the loop and wait for it to finish. A tick in progress is
    /// allowed to complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop task panicked.
    pub async fn stop(self) -> Result<()> {
        self.token.cancel();
        self.task.await.context("reconciler task panicked")
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start reconciling `manager` every `interval`, beginning immediately.
pub fn spawn<M, R>(manager: Arc<WorkloadManager<M, R>>, interval: Duration) -> ReconcilerHandle
where
    M: ManifestRepository + 'static,
    R: WorkloadRuntime + 'static,
{
    let token = CancellationToken::new();
    let task = tokio::spawn(run(manager, interval, token.clone()));
    ReconcilerHandle { token, task }
}

async fn run<M, R>(manager: Arc<WorkloadManager<M, R>>, interval: Duration, token: CancellationToken)
where
    M: ManifestRepository,
    R: WorkloadRuntime,
{
    tracing::info!(interval_secs = interval.as_secs(), "reconciler starting");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match manager.reconcile().await {
                    Ok(report) if report.is_clean() => {
                        tracing::trace!(running = report.running.len(), "workloads in sync");
                    }
                    Ok(report) => {
                        tracing::info!(
                            started = ?report.started,
                            ran = ?report.ran,
                            failed = report.failures.len(),
                            "reconciliation tick repaired drift"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), "reconciliation tick failed");
                    }
                }
            }
            () = token.cancelled() => {
                tracing::info!("reconciler received shutdown signal, exiting loop");
                break;
            }
        }
    }
}
