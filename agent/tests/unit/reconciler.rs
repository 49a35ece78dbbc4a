//! Tests for the background reconciliation loop.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use edge_agent::application::ports::WorkloadRuntime;
use edge_agent::application::services::reconciler;
use edge_agent::application::services::workload::WorkloadManager;
use edge_agent::infra::manifests::ManifestDir;
use edge_models::{WorkloadSpec, WorkloadStatus};
use tempfile::TempDir;

use crate::fakes::{NGINX_SPEC, RecordingRuntime, RuntimeCall};

async fn wait_for(runtime: &RecordingRuntime, call: &RuntimeCall) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !runtime.calls().contains(call) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("reconciler never made the expected call");
}

#[tokio::test]
async fn test_reconciler_repairs_drift_until_stopped() {
    let dir = TempDir::new().expect("tempdir");
    let runtime = RecordingRuntime::new();
    let manifests = ManifestDir::create(dir.path()).expect("manifest dir");
    let manager = Arc::new(WorkloadManager::new(manifests, runtime.clone()));
    manager
        .update(&[WorkloadSpec::new("web", NGINX_SPEC)])
        .await
        .expect("deploy");

    runtime.remove("web").await.expect("simulate deletion");
    runtime.clear_calls();

    let handle = reconciler::spawn(manager, Duration::from_millis(20));
    let run = RuntimeCall::Run(dir.path().join("manifests").join("web.yaml"));
    wait_for(&runtime, &run).await;
    assert_eq!(runtime.pods()[0].status, WorkloadStatus::Running);

    runtime.set_status("web", WorkloadStatus::Exited);
    wait_for(&runtime, &RuntimeCall::Start("web".to_string())).await;

    handle.stop().await.expect("stop");
    runtime.clear_calls();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(runtime.calls().is_empty(), "no ticks after stop");
}

#[tokio::test]
async fn test_reconciler_survives_failing_ticks() {
    let dir = TempDir::new().expect("tempdir");
    let runtime = RecordingRuntime::new();
    runtime.fail_list();
    let manifests = ManifestDir::create(dir.path()).expect("manifest dir");
    let manager = Arc::new(WorkloadManager::new(manifests, runtime.clone()));

    let handle = reconciler::spawn(manager, Duration::from_millis(10));
    tokio::time::timeout(Duration::from_secs(5), async {
        while runtime.calls().len() < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("loop stopped ticking after a failure");

    assert!(!handle.is_finished());
    handle.stop().await.expect("stop");
}
