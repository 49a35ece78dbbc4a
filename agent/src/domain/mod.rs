//! Domain layer: pure types and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod manifest;
pub mod reconcile;

pub use config::{AgentSettings, NotifyPolicy};
pub use error::{ConfigurationError, ObserverFailure, ObserverFailures, WorkloadError};
pub use manifest::{
    PodManifest, manifest_file_name, parse_manifest_name, render_pod_yaml, validate_workload_name,
};
pub use reconcile::{ReconcileAction, decide, status_by_name};
