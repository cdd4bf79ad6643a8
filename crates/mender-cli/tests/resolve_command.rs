use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_mender_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("mender")
}

#[test]
fn test_resolve_command_help() {
    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("resolve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Resolve fields against a running Chrome",
        ))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--timeout-ms"))
        .stdout(predicate::str::contains("--persist"))
        .stdout(predicate::str::contains("--fallback"));
}

#[test]
fn test_resolve_requires_a_field() {
    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("resolve");

    cmd.assert().failure();
}

#[test]
fn test_resolve_without_chrome_fails_and_keeps_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");

    // Nothing listens on port 1
    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("resolve")
        .arg("username")
        .arg("--port")
        .arg("1")
        .arg("--weights")
        .arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect to Chrome"));

    assert!(!path.exists());
}

#[test]
fn test_login_command_help() {
    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("login").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--username"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--expect"));
}
