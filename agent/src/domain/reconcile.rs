//! Reconciliation decisions.
//!
//! Pure functions only: the workload service performs the actions.

use std::collections::HashMap;

use edge_models::{WorkloadInfo, WorkloadStatus};

/// What a reconciliation tick should do for one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Present in the runtime and running.
    Keep,
    /// Present in the runtime but not running.
    Start,
    /// Absent from the runtime: create it from the manifest.
    Run,
}

/// Builds the name → status lookup used for one tick.
#[must_use]
pub fn status_by_name(workloads: Vec<WorkloadInfo>) -> HashMap<String, WorkloadStatus> {
    workloads.into_iter().map(|w| (w.name, w.status)).collect()
}

/// Decides the action for the workload declared by a manifest.
#[must_use]
pub fn decide(name: &str, live: &HashMap<String, WorkloadStatus>) -> ReconcileAction {
    match live.get(name) {
        Some(status) if status.is_running() => ReconcileAction::Keep,
        Some(_) => ReconcileAction::Start,
        None => ReconcileAction::Run,
    }
}
