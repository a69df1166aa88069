//! CLI options interaction tests
//!
//! Runs use `--duration 0` so no ICMP socket is ever opened.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Command running the binary inside an empty directory, so no stray .env is read
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nct").unwrap();
    cmd.current_dir(dir.path());
    for var in [
        "HOSTS", "DURATION", "INTERVAL", "PACKET_SIZE", "TTL", "PROBE_TIMEOUT",
        "ENABLE_LOG", "RESULTS_DIR", "LOG_LEVEL", "ENABLE_COLOR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_options() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--hosts"))
        .stdout(predicate::str::contains("--packet-size"))
        .stdout(predicate::str::contains("--fail-on-unreachable"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_zero_duration_run_completes() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--hosts", "192.0.2.1,192.0.2.2", "--duration", "0", "--nolog", "--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting ping test to hosts: 192.0.2.1, 192.0.2.2"))
        .stdout(predicate::str::contains("Test complete."))
        .stdout(predicate::str::contains("Ping Statistics"));

    assert!(!dir.path().join("results").exists());
}

#[test]
fn test_zero_duration_run_creates_empty_result_log() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--hosts", "192.0.2.1", "--duration", "0", "--results-dir", "out", "--no-plot", "--no-color"])
        .assert()
        .success();

    let logs: Vec<_> = fs::read_dir(dir.path().join("out")).unwrap().collect();
    assert_eq!(logs.len(), 1);
    let path = logs[0].as_ref().unwrap().path();
    assert_eq!(path.extension().unwrap(), "csv");
    assert!(fs::read_to_string(path).unwrap().is_empty());
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    for args in [
        vec!["--ttl", "0"],
        vec!["--interval", "0"],
        vec!["--interval", "1e-10"],
        vec!["--interval", "1e20"],
        vec!["--duration", "-1"],
        vec!["--timeout", "0"],
        vec!["--packet-size", "abc"],
    ] {
        create_test_cmd(&dir).args(&args).assert().failure();
    }
}

#[test]
fn test_conflicting_color_flags() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--color", "--no-color", "--duration", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color"));
}

#[test]
fn test_env_file_supplies_hosts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "HOSTS=198.51.100.7\nENABLE_LOG=false\n").unwrap();

    create_test_cmd(&dir)
        .args(["--duration", "0", "--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting ping test to hosts: 198.51.100.7"));

    assert!(!dir.path().join("results").exists());
}

#[test]
fn test_help_topics() {
    let dir = TempDir::new().unwrap();
    for topic in ["config", "env", "examples", "output", "permissions"] {
        create_test_cmd(&dir)
            .args(["--help-topic", topic, "--no-color"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Network Connectivity Tester"));
    }

    create_test_cmd(&dir)
        .args(["--help-topic", "nonsense", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown help topic"));
}
