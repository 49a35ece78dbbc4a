pub mod document;
pub mod workload;

pub use document::{
    DEFAULT_HEARTBEAT_PERIOD_SECONDS, DesiredStateDocument, DeviceConfiguration,
    HardwareProfileConfiguration, HeartbeatConfiguration,
};
pub use workload::{WorkloadInfo, WorkloadSpec, WorkloadStatus};
