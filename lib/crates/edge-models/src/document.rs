use serde::{Deserialize, Serialize};

use crate::workload::WorkloadSpec;

/// Heartbeat period used when no configuration has ever been received.
pub const DEFAULT_HEARTBEAT_PERIOD_SECONDS: u64 = 60;

/// Desired state pushed to a device by the control plane.
///
/// `version` and `device_id` are informational only; they never take part in
/// change detection (see [`DesiredStateDocument::has_same_desired_state`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DesiredStateDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub configuration: DeviceConfiguration,
    #[serde(default)]
    pub workloads: Vec<WorkloadSpec>,
}

impl DesiredStateDocument {
    /// Document with no workloads and the given heartbeat period.
    #[must_use]
    pub fn with_heartbeat(period_seconds: u64) -> Self {
        Self {
            configuration: DeviceConfiguration {
                heartbeat: HeartbeatConfiguration {
                    period_seconds,
                    hardware_profile: HardwareProfileConfiguration::default(),
                },
            },
            ..Self::default()
        }
    }

    /// Returns `true` when both documents ask for the same device
    /// configuration and the same ordered workload list.
    #[must_use]
    pub fn has_same_desired_state(&self, other: &Self) -> bool {
        self.configuration == other.configuration && self.workloads == other.workloads
    }
}

/// Operational settings for the device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeviceConfiguration {
    #[serde(default)]
    pub heartbeat: HeartbeatConfiguration,
}

/// How often, and with how much detail, the device reports in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartbeatConfiguration {
    #[serde(default = "default_period_seconds")]
    pub period_seconds: u64,
    #[serde(default)]
    pub hardware_profile: HardwareProfileConfiguration,
}

impl Default for HeartbeatConfiguration {
    fn default() -> Self {
        Self {
            period_seconds: default_period_seconds(),
            hardware_profile: HardwareProfileConfiguration::default(),
        }
    }
}

fn default_period_seconds() -> u64 {
    DEFAULT_HEARTBEAT_PERIOD_SECONDS
}

/// Hardware profile section of the heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HardwareProfileConfiguration {
    #[serde(default)]
    pub include: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
}
