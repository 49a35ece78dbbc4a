//! Shared fakes for the port traits.
//!
//! Each fake records what it was asked to do so tests can assert on the exact
//! sequence of runtime, store and observer calls.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use edge_agent::application::ports::{ConfigObserver, ConfigStateStore, WorkloadRuntime};
use edge_models::{DesiredStateDocument, WorkloadInfo, WorkloadSpec, WorkloadStatus};

pub const NGINX_SPEC: &str =
    "containers:\n- name: web\n  image: docker.io/library/nginx:latest\n";

pub fn document(version: &str, workloads: &[&str]) -> DesiredStateDocument {
    DesiredStateDocument {
        version: version.to_string(),
        workloads: workloads
            .iter()
            .map(|name| WorkloadSpec::new(*name, NGINX_SPEC))
            .collect(),
        ..DesiredStateDocument::with_heartbeat(60)
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

/// One call made against [`RecordingRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    List,
    Run(PathBuf),
    Start(String),
    Remove(String),
}

/// In-memory container runtime.
///
/// `run` registers the pod named in the manifest file as `Running`, `remove`
/// drops it. Individual operations can be made to fail by workload name.
/// Clones share state, so a test keeps one handle and gives another to the
/// workload manager.
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    state: Arc<RuntimeState>,
}

#[derive(Default)]
struct RuntimeState {
    pods: Mutex<Vec<WorkloadInfo>>,
    calls: Mutex<Vec<RuntimeCall>>,
    fail_list: Mutex<bool>,
    fail_run: Mutex<HashSet<String>>,
    fail_start: Mutex<HashSet<String>>,
    fail_remove: Mutex<HashSet<String>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pods(pods: &[(&str, WorkloadStatus)]) -> Self {
        let runtime = Self::default();
        *runtime.state.pods.lock().expect("lock") = pods
            .iter()
            .map(|(name, status)| WorkloadInfo::new(*name, status.clone()))
            .collect();
        runtime
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.state.calls.lock().expect("lock").clone()
    }

    /// Calls other than `List`, which most tests don't care about.
    pub fn mutating_calls(&self) -> Vec<RuntimeCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != RuntimeCall::List)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.calls.lock().expect("lock").clear();
    }

    pub fn pods(&self) -> Vec<WorkloadInfo> {
        self.state.pods.lock().expect("lock").clone()
    }

    pub fn status_of(&self, name: &str) -> Option<WorkloadStatus> {
        self.pods()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.status)
    }

    pub fn set_status(&self, name: &str, status: WorkloadStatus) {
        for pod in self.state.pods.lock().expect("lock").iter_mut() {
            if pod.name == name {
                pod.status = status.clone();
            }
        }
    }

    pub fn fail_list(&self) {
        *self.state.fail_list.lock().expect("lock") = true;
    }

    pub fn fail_run_of(&self, name: &str) {
        self.state.fail_run.lock().expect("lock").insert(name.to_string());
    }

    pub fn fail_start_of(&self, name: &str) {
        self.state.fail_start.lock().expect("lock").insert(name.to_string());
    }

    pub fn fail_remove_of(&self, name: &str) {
        self.state.fail_remove.lock().expect("lock").insert(name.to_string());
    }

    fn record(&self, call: RuntimeCall) {
        self.state.calls.lock().expect("lock").push(call);
    }
}

/// Name declared in a manifest file written by the workload manager.
fn manifest_name(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    edge_agent::domain::manifest::parse_manifest_name(&content)
}

#[async_trait]
impl WorkloadRuntime for RecordingRuntime {
    async fn list(&self) -> Result<Vec<WorkloadInfo>> {
        self.record(RuntimeCall::List);
        if *self.state.fail_list.lock().expect("lock") {
            anyhow::bail!("runtime unavailable");
        }
        Ok(self.pods())
    }

    async fn run(&self, manifest: &Path) -> Result<()> {
        self.record(RuntimeCall::Run(manifest.to_path_buf()));
        let name = manifest_name(manifest)?;
        if self.state.fail_run.lock().expect("lock").contains(&name) {
            anyhow::bail!("cannot play {name}");
        }
        let mut pods = self.state.pods.lock().expect("lock");
        pods.retain(|p| p.name != name);
        pods.push(WorkloadInfo::new(name, WorkloadStatus::Running));
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<()> {
        self.record(RuntimeCall::Start(name.to_string()));
        if self.state.fail_start.lock().expect("lock").contains(name) {
            anyhow::bail!("cannot start {name}");
        }
        self.set_status(name, WorkloadStatus::Running);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.record(RuntimeCall::Remove(name.to_string()));
        if self.state.fail_remove.lock().expect("lock").contains(name) {
            anyhow::bail!("cannot remove {name}");
        }
        self.state.pods.lock().expect("lock").retain(|p| p.name != name);
        Ok(())
    }
}

// ── Config store ──────────────────────────────────────────────────────────────

/// In-memory `ConfigStateStore` with a save counter and failure switch.
pub struct MemoryConfigStore {
    path: PathBuf,
    document: Mutex<Option<DesiredStateDocument>>,
    saves: Mutex<u32>,
    fail_load: bool,
    fail_save: Mutex<bool>,
}

impl MemoryConfigStore {
    pub fn new(initial: Option<DesiredStateDocument>) -> Self {
        Self {
            path: PathBuf::from("/data/device-config.json"),
            document: Mutex::new(initial),
            saves: Mutex::new(0),
            fail_load: false,
            fail_save: Mutex::new(false),
        }
    }

    pub fn corrupted() -> Self {
        Self {
            fail_load: true,
            ..Self::new(None)
        }
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock().expect("lock")
    }

    pub fn saved(&self) -> Option<DesiredStateDocument> {
        self.document.lock().expect("lock").clone()
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_save.lock().expect("lock") = fail;
    }
}

#[async_trait]
impl ConfigStateStore for MemoryConfigStore {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<DesiredStateDocument>> {
        if self.fail_load {
            anyhow::bail!("parsing device config: expected value at line 1 column 1");
        }
        Ok(self.saved())
    }

    async fn save(&self, document: &DesiredStateDocument) -> Result<()> {
        if *self.fail_save.lock().expect("lock") {
            anyhow::bail!("disk full");
        }
        *self.saves.lock().expect("lock") += 1;
        *self.document.lock().expect("lock") = Some(document.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        match self.document.lock().expect("lock").take() {
            Some(_) => Ok(()),
            None => anyhow::bail!("no such file"),
        }
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Observer that records every version it sees and can be told to fail.
pub struct RecordingObserver {
    name: String,
    fail: bool,
    seen: Mutex<Vec<String>>,
    journal: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingObserver {
    pub fn accepting(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            seen: Mutex::new(Vec::new()),
            journal: None,
        }
    }

    pub fn rejecting(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::accepting(name)
        }
    }

    /// Also append this observer's name to a journal shared between observers,
    /// to check notification order.
    pub fn with_journal(mut self, journal: Arc<Mutex<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn seen_versions(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().expect("lock").len()
    }
}

#[async_trait]
impl ConfigObserver for RecordingObserver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_configuration(&self, document: &DesiredStateDocument) -> Result<()> {
        self.seen.lock().expect("lock").push(document.version.clone());
        if let Some(journal) = &self.journal {
            journal.lock().expect("lock").push(self.name.clone());
        }
        if self.fail {
            anyhow::bail!("{} refused version {}", self.name, document.version);
        }
        Ok(())
    }
}
