//! Application service: workload manager.
//!
//! Materializes desired workloads as pod manifests, (re)creates them through
//! the container runtime, and repairs drift between the manifest directory and
//! the live runtime on every reconciliation tick.
//!
//! Every operation that touches the manifest directory or the runtime holds
//! `ops_lock` for its whole duration, so a push-driven update and a
//! reconciliation tick never interleave.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use edge_models::{DesiredStateDocument, WorkloadInfo, WorkloadSpec};
use tokio::sync::Mutex;

use crate::application::ports::{ConfigObserver, ManifestRepository, WorkloadRuntime};
use crate::domain::error::WorkloadError;
use crate::domain::manifest::{
    manifest_file_name, parse_manifest_name, render_pod_yaml, validate_workload_name,
};
use crate::domain::reconcile::{ReconcileAction, decide, status_by_name};

/// What one reconciliation tick did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Workloads that existed but were not running and got started.
    pub started: Vec<String>,
    /// Workloads that were missing from the runtime and got created.
    pub ran: Vec<String>,
    /// Workloads that were already running.
    pub running: Vec<String>,
    /// Manifest files skipped because of an error, with the error text.
    pub failures: Vec<(PathBuf, String)>,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.started.is_empty() && self.ran.is_empty() && self.failures.is_empty()
    }
}

pub struct WorkloadManager<M, R> {
    manifests: M,
    runtime: R,
    ops_lock: Mutex<()>,
}

impl<M, R> WorkloadManager<M, R>
where
    M: ManifestRepository,
    R: WorkloadRuntime,
{
    pub fn new(manifests: M, runtime: R) -> Self {
        Self {
            manifests,
            runtime,
            ops_lock: Mutex::new(()),
        }
    }

    /// Make the manifest directory and the runtime match `workloads`.
    ///
    /// An empty list purges every runtime workload and every manifest.
    /// Otherwise each workload is written, removed from the runtime and run
    /// again, in order, and manifests of workloads no longer listed are then
    /// removed together with their runtime workload. The first failure aborts
    /// the call; workloads handled before it stay applied.
    ///
    /// # Errors
    ///
    /// Returns the first manifest, filesystem or runtime error encountered.
    pub async fn update(&self, workloads: &[WorkloadSpec]) -> Result<()> {
        let _guard = self.ops_lock.lock().await;
        if workloads.is_empty() {
            tracing::debug!("no workloads, purging");
            self.purge_workloads().await?;
            self.manifests.remove_all().await.context("removing manifests")?;
            return Ok(());
        }

        // TODO: compensate workloads already deployed when a later one fails.
        for workload in workloads {
            tracing::debug!(workload = %workload.name, "deploying workload");
            let manifest_path = self.store_manifest(workload).await?;
            self.runtime
                .remove(&workload.name)
                .await
                .map_err(|source| runtime_error("remove", &workload.name, source))?;
            self.runtime
                .run(&manifest_path)
                .await
                .map_err(|source| runtime_error("run", &workload.name, source))?;
        }
        self.prune_manifests(workloads).await
    }

    /// Live workloads, straight from the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot list workloads.
    pub async fn list_workloads(&self) -> Result<Vec<WorkloadInfo>> {
        self.runtime.list().await
    }

    async fn purge_workloads(&self) -> Result<()> {
        let workloads = self
            .runtime
            .list()
            .await
            .inspect_err(|e| tracing::error!(error = %format!("{e:#}"), "cannot list workloads"))?;
        for workload in workloads {
            self.runtime
                .remove(&workload.name)
                .await
                .map_err(|source| runtime_error("remove", &workload.name, source))?;
        }
        Ok(())
    }

    async fn prune_manifests(&self, workloads: &[WorkloadSpec]) -> Result<()> {
        let desired: HashSet<String> = workloads
            .iter()
            .map(|w| manifest_file_name(&w.name))
            .collect();
        for path in self.manifests.list().await.context("listing manifests")? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if desired.contains(&file_name) {
                continue;
            }
            // Unreadable leftovers have no workload to remove.
            if let Ok(name) = self.manifest_name(&path).await {
                self.runtime
                    .remove(&name)
                    .await
                    .map_err(|source| runtime_error("remove", &name, source))?;
            }
            tracing::debug!(manifest = %path.display(), "removing stale manifest");
            self.manifests.remove(&path).await?;
        }
        Ok(())
    }

    async fn store_manifest(&self, workload: &WorkloadSpec) -> Result<PathBuf> {
        validate_workload_name(&workload.name)?;
        let yaml = render_pod_yaml(workload)?;
        self.manifests
            .write(&manifest_file_name(&workload.name), &yaml)
            .await
            .with_context(|| format!("storing manifest for workload '{}'", workload.name))
    }

    async fn manifest_name(&self, path: &Path) -> Result<String> {
        let content = self.manifests.read(path).await?;
        parse_manifest_name(&content)
    }

    /// One reconciliation pass over the manifest directory.
    ///
    /// Per-manifest failures are recorded in the report and do not stop the
    /// pass. Manifests are never created or deleted here, and runtime
    /// workloads without a manifest are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error only if the manifest directory or the runtime cannot
    /// be listed.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let _guard = self.ops_lock.lock().await;
        let manifest_paths = self.manifests.list().await.context("listing manifests")?;
        let live = status_by_name(self.runtime.list().await.context("listing workloads")?);

        let mut report = ReconcileReport::default();
        for path in manifest_paths {
            let name = match self.manifest_name(&path).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::error!(manifest = %path.display(), error = %format!("{e:#}"), "cannot read manifest");
                    report.failures.push((path, format!("{e:#}")));
                    continue;
                }
            };

            match decide(&name, &live) {
                ReconcileAction::Keep => report.running.push(name),
                ReconcileAction::Start => match self.runtime.start(&name).await {
                    Ok(()) => {
                        tracing::info!(workload = %name, "started stopped workload");
                        report.started.push(name);
                    }
                    Err(e) => {
                        tracing::error!(workload = %name, error = %format!("{e:#}"), "cannot start workload");
                        report.failures.push((path, format!("{e:#}")));
                    }
                },
                ReconcileAction::Run => match self.runtime.run(&path).await {
                    Ok(()) => {
                        tracing::info!(workload = %name, "ran missing workload");
                        report.ran.push(name);
                    }
                    Err(e) => {
                        tracing::error!(workload = %name, error = %format!("{e:#}"), "cannot run workload");
                        report.failures.push((path, format!("{e:#}")));
                    }
                },
            }
        }
        Ok(report)
    }
}

fn runtime_error(operation: &'static str, name: &str, source: anyhow::Error) -> anyhow::Error {
    tracing::error!(workload = %name, operation, error = %format!("{source:#}"), "runtime operation failed");
    WorkloadError::Runtime {
        operation,
        name: name.to_string(),
        source,
    }
    .into()
}

#[async_trait]
impl<M, R> ConfigObserver for WorkloadManager<M, R>
where
    M: ManifestRepository,
    R: WorkloadRuntime,
{
    fn name(&self) -> &str {
        "workloads"
    }

    async fn on_configuration(&self, document: &DesiredStateDocument) -> Result<()> {
        self.update(&document.workloads).await
    }
}
