//! Integration tests for commands that only touch local state: `show`,
//! `apply` on bad input and `deregister`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Dirs {
    data: TempDir,
    config: TempDir,
}

impl Dirs {
    fn new() -> Self {
        Self {
            data: TempDir::new().expect("data dir"),
            config: TempDir::new().expect("config dir"),
        }
    }

    fn agent(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("edge-agent"));
        cmd.env("RUST_LOG", "off")
            .arg("--data-dir")
            .arg(self.data.path())
            .arg("--config-dir")
            .arg(self.config.path());
        cmd
    }

    fn device_config(&self) -> std::path::PathBuf {
        self.data.path().join("device-config.json")
    }
}

const PERSISTED: &str = r#"{
  "device_id": "dev-1",
  "version": "42",
  "configuration": { "heartbeat": { "period_seconds": 30 } },
  "workloads": [ { "name": "app", "specification": "containers: []\n" } ]
}"#;

// --- show ---

#[test]
fn test_show_without_persisted_config_prints_initial_default() {
    let dirs = Dirs::new();
    dirs.agent()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""initial_config": true"#))
        .stdout(predicate::str::contains(r#""period_seconds": 60"#));
}

#[test]
fn test_show_uses_default_heartbeat_from_settings() {
    let dirs = Dirs::new();
    std::fs::write(
        dirs.config.path().join("agent.yaml"),
        "default_heartbeat_seconds: 5\n",
    )
    .expect("settings");
    dirs.agent()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""period_seconds": 5"#));
}

#[test]
fn test_show_prints_persisted_config() {
    let dirs = Dirs::new();
    std::fs::write(dirs.device_config(), PERSISTED).expect("seed");
    dirs.agent()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""initial_config": false"#))
        .stdout(predicate::str::contains(r#""version": "42""#))
        .stdout(predicate::str::contains(r#""name": "app""#));
}

#[test]
fn test_show_with_corrupt_config_falls_back_to_default() {
    let dirs = Dirs::new();
    std::fs::write(dirs.device_config(), "{ not json").expect("seed");
    dirs.agent()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""initial_config": true"#));
}

#[test]
fn test_invalid_settings_file_fails_every_command() {
    let dirs = Dirs::new();
    std::fs::write(dirs.config.path().join("agent.yaml"), "notify_policy: sometimes\n")
        .expect("settings");
    dirs.agent()
        .arg("show")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_show_creates_manifest_directory() {
    let dirs = Dirs::new();
    dirs.agent().arg("show").assert().success();
    assert!(dirs.config.path().join("manifests").is_dir());
}

// --- apply ---

#[test]
fn test_apply_with_invalid_document_fails_without_persisting() {
    let dirs = Dirs::new();
    let doc = dirs.config.path().join("desired.json");
    std::fs::write(&doc, "workloads: nope").expect("seed");
    dirs.agent()
        .arg("apply")
        .arg(&doc)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
    assert!(!dirs.device_config().exists());
}

#[test]
fn test_apply_with_missing_file_fails() {
    let dirs = Dirs::new();
    dirs.agent()
        .args(["apply", "/nonexistent/desired.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// --- deregister ---

#[test]
fn test_deregister_removes_persisted_config() {
    let dirs = Dirs::new();
    std::fs::write(dirs.device_config(), PERSISTED).expect("seed");
    dirs.agent().arg("deregister").assert().success();
    assert!(!dirs.device_config().exists());
}

#[test]
fn test_deregister_without_persisted_config_fails() {
    let dirs = Dirs::new();
    dirs.agent()
        .arg("deregister")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
