//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `edge_models`, never from
//! `crate::infra`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use edge_models::{DesiredStateDocument, WorkloadInfo};

// ── Container Runtime Port ────────────────────────────────────────────────────

/// Container runtime operations over named workloads backed by manifest files.
#[async_trait]
pub trait WorkloadRuntime: Send + Sync {
    /// List every workload the runtime knows about.
    async fn list(&self) -> Result<Vec<WorkloadInfo>>;
    /// Create and start the workload described by a manifest file.
    async fn run(&self, manifest: &Path) -> Result<()>;
    /// Start an existing, stopped workload.
    async fn start(&self, name: &str) -> Result<()>;
    /// Remove a workload by name.
    async fn remove(&self, name: &str) -> Result<()>;
}

// ── Observer Port ─────────────────────────────────────────────────────────────

/// Component that must accept a new desired-state document before it is
/// persisted.
///
/// Observers are notified one at a time, in registration order.
#[async_trait]
pub trait ConfigObserver: Send + Sync {
    /// Short name used in error reports and logs.
    fn name(&self) -> &str;
    /// Apply the new document. An error vetoes persistence.
    async fn on_configuration(&self, document: &DesiredStateDocument) -> Result<()>;
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Persistence of the last applied desired-state document.
#[async_trait]
pub trait ConfigStateStore: Send + Sync {
    /// Location of the backing file, for logs and error messages.
    fn path(&self) -> &Path;
    /// Load the persisted document, returning `None` if none exists.
    async fn load(&self) -> Result<Option<DesiredStateDocument>>;
    /// Persist the document, replacing any previous one.
    async fn save(&self, document: &DesiredStateDocument) -> Result<()>;
    /// Delete the persisted document.
    async fn remove(&self) -> Result<()>;
}

/// Directory of on-disk pod manifests, one file per workload.
#[async_trait]
pub trait ManifestRepository: Send + Sync {
    /// Write (or overwrite) a manifest and return its full path.
    async fn write(&self, file_name: &str, content: &str) -> Result<PathBuf>;
    /// Full paths of every manifest file, sorted by name.
    async fn list(&self) -> Result<Vec<PathBuf>>;
    /// Read one manifest file.
    async fn read(&self, path: &Path) -> Result<String>;
    /// Delete one manifest file.
    async fn remove(&self, path: &Path) -> Result<()>;
    /// Delete every manifest file.
    async fn remove_all(&self) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}
