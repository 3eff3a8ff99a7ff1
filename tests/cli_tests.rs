//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn autodock_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_autodock"))
}

#[test]
fn help_output() {
    autodock_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("posture"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("override"))
        .stdout(predicate::str::contains("clear"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    autodock_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("autodock"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_help_lists_timing_flags() {
    autodock_bin()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--debounce-ms"))
        .stdout(predicate::str::contains("--poll-secs"))
        .stdout(predicate::str::contains("--rescan-secs"))
        .stdout(predicate::str::contains("--notify"));
}

#[test]
fn config_path_command() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("autodock"))
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn config_show_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stream_cam_keyword"))
        .stdout(predicate::str::contains("StreamCam"));
}

#[test]
fn config_set_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "closed_mic", "Logi StreamCam, Desk Mic"])
        .assert()
        .success();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "get", "closed_mic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logi StreamCam, Desk Mic"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "api_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_init_refuses_second_run() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    autodock_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn status_without_daemon_fails() {
    let dir = tempfile::tempdir().unwrap();

    autodock_bin()
        .env("XDG_RUNTIME_DIR", dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No daemon running"));
}

#[test]
fn override_rejects_unknown_category() {
    autodock_bin()
        .args(["override", "projector", "Some Device"])
        .assert()
        .failure();
}
