// username-check/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a data directory with a config file.
fn data_dir_with_config(config: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), config).expect("Failed to write config");
    dir
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--threads"))
        .stdout(predicate::str::contains("--no-retry"))
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("--webhook"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("username-check"));
}

#[test]
fn test_missing_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_explicit_config_path_missing_exits_nonzero() {
    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--config", "/nonexistent/config.toml"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_empty_username_list_exits_nonzero() {
    let dir = data_dir_with_config("[usernames]\ncustom = true\n");
    fs::write(dir.path().join("usernames.txt"), "").unwrap();

    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No usernames to check"));
}

#[test]
fn test_missing_username_file_exits_nonzero() {
    let dir = data_dir_with_config("[usernames]\ncustom = true\n");

    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("usernames.txt"));
}

#[test]
fn test_invalid_config_values_exit_nonzero() {
    let dir = data_dir_with_config("threads = 0\n");

    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("threads"));
}

#[test]
fn test_zero_thread_override_rejected() {
    let mut cmd = Command::cargo_bin("username-check").unwrap();
    cmd.args(["--threads", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Thread count must be at least 1"));
}
