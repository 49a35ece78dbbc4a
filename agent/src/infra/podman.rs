//! Infrastructure implementation of the `WorkloadRuntime` port on top of the
//! `podman` CLI. Each workload is a podman pod created with `podman play kube`.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use async_trait::async_trait;
use edge_models::{WorkloadInfo, WorkloadStatus};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, WorkloadRuntime};

const PODMAN: &str = "podman";

/// One entry of `podman pod ps --format json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PodReport {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    status: String,
}

impl From<PodReport> for WorkloadInfo {
    fn from(report: PodReport) -> Self {
        WorkloadInfo {
            id: report.id,
            name: report.name,
            status: WorkloadStatus::from(report.status.as_str()),
        }
    }
}

/// Podman-backed container runtime.
pub struct PodmanRuntime<R> {
    runner: R,
}

impl<R: CommandRunner> PodmanRuntime<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn podman(&self, args: &[&str]) -> Result<Output> {
        let output = self.runner.run(PODMAN, args).await?;
        if !output.status.success() {
            anyhow::bail!(
                "podman {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }
}

/// Parse `podman pod ps --format json` output.
///
/// # Errors
///
/// Returns an error if the output is not the expected JSON array.
pub fn parse_pod_list(stdout: &[u8]) -> Result<Vec<WorkloadInfo>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(Vec::new());
    }
    let reports: Vec<PodReport> = serde_json::from_str(text).context("parsing podman pod list")?;
    Ok(reports.into_iter().map(WorkloadInfo::from).collect())
}

#[async_trait]
impl<R: CommandRunner> WorkloadRuntime for PodmanRuntime<R> {
    async fn list(&self) -> Result<Vec<WorkloadInfo>> {
        let output = self.podman(&["pod", "ps", "--format", "json"]).await?;
        parse_pod_list(&output.stdout)
    }

    async fn run(&self, manifest: &Path) -> Result<()> {
        let manifest = manifest.to_string_lossy().into_owned();
        self.podman(&["play", "kube", manifest.as_str()]).await?;
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<()> {
        self.podman(&["pod", "start", name]).await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.podman(&["pod", "rm", "--force", "--ignore", name]).await?;
        Ok(())
    }
}
