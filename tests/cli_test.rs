//! End-to-end CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("hae")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("networks"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("ping"));
}

#[test]
fn test_ping_without_server_url_fails_with_hint() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("hae")
        .unwrap()
        .arg("ping")
        .env_remove("HAE_SERVER_URL")
        .env_remove("HAE_TOKEN")
        .env("HOME", home.path())
        .current_dir(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server URL not configured"));
}

#[test]
fn test_config_set_and_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("hae")
        .unwrap()
        .args(["config", "server.url", "https://api.hae.app"])
        .current_dir(dir.path())
        .assert()
        .success();

    Command::cargo_bin("hae")
        .unwrap()
        .args(["config", "server.url"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.hae.app"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("hae")
        .unwrap()
        .args(["config", "search.default_limit", "10"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_networks_rename_requires_arguments() {
    Command::cargo_bin("hae")
        .unwrap()
        .args(["networks", "rename"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
