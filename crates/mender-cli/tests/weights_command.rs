use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

#[allow(deprecated)]
fn get_mender_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("mender")
}

fn write_weights(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("selectors_weight.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_weights_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selectors_weight.json");

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights").arg("--weights").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No learned selectors yet."));

    // Reading never creates the store
    assert!(!path.exists());
}

#[test]
fn test_weights_pretty_ranks_each_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_weights(
        dir.path(),
        r##"{"username": {"input[name=u]": 1, "input#user": 3}, "password": {"#pw": 2}}"##,
    );

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights").arg("--weights").arg(&path);

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    let first = stdout.find("input#user").unwrap();
    let second = stdout.find("input[name=u]").unwrap();
    assert!(first < second, "Higher score should be listed first");
    assert!(stdout.contains("password"));
}

#[test]
fn test_weights_json_is_raw_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_weights(dir.path(), r#"{"username": {"input#user": 3}}"#);

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights")
        .arg("--weights")
        .arg(&path)
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(parsed["username"]["input#user"], 3);
}

#[test]
fn test_weights_field_filter_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_weights(
        dir.path(),
        r##"{"username": {"input#user": 3}, "password": {"#pw": 2}}"##,
    );

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights")
        .arg("--weights")
        .arg(&path)
        .arg("--field")
        .arg("password")
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Field,Rank,Selector,Score"))
        .stdout(predicate::str::contains("password,1,\"#pw\",2"))
        .stdout(predicate::str::contains("input#user").not());
}

#[test]
fn test_weights_corrupt_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_weights(dir.path(), "{ definitely not json");

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights").arg("--weights").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is not valid"));
}

#[test]
fn test_weights_path_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_weights(dir.path(), r#"{"login_button": {"button.primary": 5}}"#);

    let mut cmd = Command::new(get_mender_bin());
    cmd.arg("weights").env("MENDER_WEIGHTS", &path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("button.primary"));
}
