//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`.

pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ConfigObserver, ConfigStateStore, ManifestRepository, WorkloadRuntime,
};
pub use services::configuration::{ConfigurationManager, UpdateOutcome};
pub use services::reconciler::ReconcilerHandle;
pub use services::workload::{ReconcileReport, WorkloadManager};
