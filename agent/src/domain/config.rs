//! Agent settings schema.
//!
//! Pure functions only, no I/O.

use std::time::Duration;

use edge_models::{DEFAULT_HEARTBEAT_PERIOD_SECONDS, DesiredStateDocument};
use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_RUNTIME_TIMEOUT_SECS: u64 = 60;

// ── Settings schema ──────────────────────────────────────────────────────────

/// How observers are notified of a new desired-state document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Stop at the first observer that fails.
    #[default]
    FailFast,
    /// Notify every observer and report all failures together.
    BestEffort,
}

/// Agent settings stored in `<config_dir>/agent.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentSettings {
    /// Seconds between reconciliation ticks.
    pub reconcile_interval_secs: u64,
    /// Heartbeat period of the document used before any configuration arrives.
    pub default_heartbeat_seconds: u64,
    /// Observer notification policy.
    pub notify_policy: NotifyPolicy,
    /// Timeout for a single container runtime command.
    pub runtime_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
            default_heartbeat_seconds: DEFAULT_HEARTBEAT_PERIOD_SECONDS,
            notify_policy: NotifyPolicy::default(),
            runtime_timeout_secs: DEFAULT_RUNTIME_TIMEOUT_SECS,
        }
    }
}

impl AgentSettings {
    #[must_use]
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs.max(1))
    }

    #[must_use]
    pub fn runtime_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime_timeout_secs.max(1))
    }

    /// The document the configuration manager falls back to when nothing has
    /// been persisted yet.
    #[must_use]
    pub fn default_document(&self) -> DesiredStateDocument {
        DesiredStateDocument::with_heartbeat(self.default_heartbeat_seconds)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
