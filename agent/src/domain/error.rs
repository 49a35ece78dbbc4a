//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra` or `crate::application`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// A single observer that refused a new desired-state document.
#[derive(Debug)]
pub struct ObserverFailure {
    pub observer: String,
    pub error: anyhow::Error,
}

/// Every observer failure recorded during one notification pass.
///
/// Under the fail-fast policy this holds exactly one entry.
#[derive(Debug, Default)]
pub struct ObserverFailures(pub Vec<ObserverFailure>);

impl ObserverFailures {
    pub fn push(&mut self, observer: &str, error: anyhow::Error) {
        self.0.push(ObserverFailure {
            observer: observer.to_string(),
            error,
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObserverFailure> {
        self.0.iter()
    }
}

impl fmt::Display for ObserverFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "cannot update observer '{}': {:#}",
                failure.observer, failure.error
            )?;
        }
        Ok(())
    }
}

/// Errors returned by the configuration manager's update path.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{0}")]
    ObserversRejected(ObserverFailures),

    #[error("cannot write device config file '{}'", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

// ── Workload errors ───────────────────────────────────────────────────────────

/// Errors related to workload manifests and runtime operations.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Invalid workload name '{0}': must be non-empty and must not contain path separators")]
    InvalidName(String),

    #[error("Invalid specification for workload '{name}': {reason}")]
    InvalidSpecification { name: String, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("cannot {operation} workload '{name}'")]
    Runtime {
        operation: &'static str,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
