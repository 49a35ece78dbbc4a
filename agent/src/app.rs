//! Application context wiring the managers to their adapters.
//!
//! Constructed once per process from the top-level CLI paths and passed as
//! `&AppContext` to every command handler.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::application::services::configuration::ConfigurationManager;
use crate::application::services::workload::WorkloadManager;
use crate::domain::config::AgentSettings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::load_settings;
use crate::infra::manifests::ManifestDir;
use crate::infra::podman::PodmanRuntime;
use crate::infra::state::JsonConfigStore;

/// Workload manager backed by the manifest directory and podman.
pub type AgentWorkloadManager = WorkloadManager<ManifestDir, PodmanRuntime<TokioCommandRunner>>;

/// Filesystem locations passed from the top-level CLI to `AppContext::new`.
pub struct AppPaths {
    /// Directory holding `device-config.json`.
    pub data_dir: PathBuf,
    /// Directory holding `agent.yaml` and `manifests/`.
    pub config_dir: PathBuf,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Settings loaded from `agent.yaml` (or defaults).
    pub settings: AgentSettings,
    /// Desired-state owner; the workload manager is registered as its observer.
    pub config: ConfigurationManager,
    /// Manifest and runtime owner.
    pub workloads: Arc<AgentWorkloadManager>,
}

impl AppContext {
    /// Build the context: load settings, open the manifest directory, load
    /// the persisted configuration and register the workload manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or the manifest
    /// directory cannot be created.
    pub async fn new(paths: &AppPaths) -> Result<Self> {
        let settings = load_settings(&paths.config_dir)?;
        tracing::debug!(?settings, "settings loaded");

        let manifests = ManifestDir::create(&paths.config_dir)?;
        let runtime = PodmanRuntime::new(TokioCommandRunner::new(settings.runtime_timeout()));
        let workloads = Arc::new(WorkloadManager::new(manifests, runtime));

        let store = Arc::new(JsonConfigStore::in_data_dir(&paths.data_dir));
        let mut config =
            ConfigurationManager::load(store, settings.default_document(), settings.notify_policy)
                .await;
        config.register_observer(workloads.clone());

        Ok(Self {
            settings,
            config,
            workloads,
        })
    }
}
