//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with HOME pointed at an empty directory (no config file)
fn guestbook(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("guestbook").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("GUESTBOOK_ENDPOINT")
        .env("GUESTBOOK_QUIET", "1");
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_commands() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("post"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_post_help() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["post", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read the message from a file"));
}

#[test]
fn test_list_help() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output format"));
}

// === Local validation (never reaches the network) ===

#[test]
fn test_post_rejects_spam_locally() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["--endpoint", "http://127.0.0.1:9"])
        .args(["post", "--name", "Ada", "--message", "FREE stuff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Message appears to be spam. Please write a genuine message.",
        ));
}

#[test]
fn test_post_reports_every_validation_error() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["post", "--name", "   "])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Name is required. Message is required.",
        ));
}

#[test]
fn test_unreachable_server_fails_post() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["--endpoint", "http://127.0.0.1:9"])
        .args(["post", "--name", "Ada", "--message", "Hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to post message. Please try again.",
        ));
}

#[test]
fn test_bad_endpoint_is_rejected() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["--endpoint", "ftp://box", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid endpoint"));
}

// === Config ===

#[test]
fn test_config_init_then_show() {
    let home = TempDir::new().unwrap();
    guestbook(&home).args(["config", "init"]).assert().success();

    assert!(home.path().join(".guestbook/config.toml").exists());

    guestbook(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    guestbook(&home)
        .args(["--endpoint", "http://box:8080", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"http://box:8080\""))
        .stdout(predicate::str::contains("refresh_interval_secs = 30"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".guestbook");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "endpoint = [").unwrap();

    guestbook(&home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_completions_generate() {
    let home = TempDir::new().unwrap();
    guestbook(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("guestbook"));
}
