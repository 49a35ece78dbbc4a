use std::fmt;

use serde::{Deserialize, Serialize};

/// One workload the device should run.
///
/// `specification` is raw pod-spec YAML. Names must be unique within a
/// document; duplicates are not rejected here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub name: String,
    pub specification: String,
}

impl WorkloadSpec {
    pub fn new(name: impl Into<String>, specification: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specification: specification.into(),
        }
    }
}

/// Live status of a workload as reported by the container runtime.
///
/// Serialized as its display form (`"Running"`); parsing is case-insensitive
/// and keeps unrecognized values as [`WorkloadStatus::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkloadStatus {
    Running,
    Created,
    Stopped,
    Exited,
    Degraded,
    Unknown(String),
}

impl WorkloadStatus {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, WorkloadStatus::Running)
    }
}

impl From<String> for WorkloadStatus {
    fn from(raw: String) -> Self {
        WorkloadStatus::from(raw.as_str())
    }
}

impl From<WorkloadStatus> for String {
    fn from(status: WorkloadStatus) -> Self {
        status.to_string()
    }
}

impl From<&str> for WorkloadStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => WorkloadStatus::Running,
            "created" => WorkloadStatus::Created,
            "stopped" => WorkloadStatus::Stopped,
            "exited" => WorkloadStatus::Exited,
            "degraded" => WorkloadStatus::Degraded,
            _ => WorkloadStatus::Unknown(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadStatus::Running => f.write_str("Running"),
            WorkloadStatus::Created => f.write_str("Created"),
            WorkloadStatus::Stopped => f.write_str("Stopped"),
            WorkloadStatus::Exited => f.write_str("Exited"),
            WorkloadStatus::Degraded => f.write_str("Degraded"),
            WorkloadStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Runtime view of a workload. Never persisted by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub status: WorkloadStatus,
}

impl WorkloadInfo {
    pub fn new(name: impl Into<String>, status: WorkloadStatus) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            status,
        }
    }
}
