//! Application services: use-case orchestration.
//!
//! Services import only from `crate::domain` and `crate::application::ports`,
//! never from `crate::infra`.

pub mod configuration;
pub mod reconciler;
pub mod workload;
