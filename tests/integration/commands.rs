//! Commands that work without reaching the network.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use super::burrow;

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_first_run_bootstraps_configuration() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .arg("installed")
        .assert()
        .success()
        .stdout(predicate::str::contains("There are no installed packages"));

    assert!(temp.path().join("config.yaml").exists());
    assert!(temp.path().join("repositories.yaml").exists());
}

#[test]
fn test_uninstall_unknown_package_fails() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .args(["uninstall", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No installation found for ghost"));
}

#[test]
fn test_uninstall_self_is_refused() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .args(["uninstall", "burrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved"));
}

#[test]
fn test_installed_lists_records() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("installations.yaml"),
        "installations:\n  - timestamp: 1700000000000\n    packageFullName: owner/tool\n    executableName: tool\n    alias: t\n    realName: t\n    version: v1.2.0\n",
    )
    .unwrap();

    burrow(temp.path())
        .arg("installed")
        .assert()
        .success()
        .stdout(predicate::str::contains("t v1.2.0 (alias of tool) from owner/tool"));
}

#[test]
fn test_config_round_trip() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .args(["config", "--auto-update", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved"));

    let content = fs::read_to_string(temp.path().join("config.yaml")).unwrap();
    assert!(content.contains("autoUpdate: false"));
    assert!(content.contains("notifyOutdatedVersions: true"));

    burrow(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("autoUpdate:").and(predicate::str::contains("false")));
}

#[test]
fn test_add_remote_rejects_duplicates() {
    let temp = TempDir::new().unwrap();
    let url = "https://example.com/packages.yaml";

    burrow(temp.path()).args(["add", "remote", url]).assert().success();
    burrow(temp.path())
        .args(["add", "remote", url, "--type", "open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    burrow(temp.path())
        .args(["add", "remote", "https://example.com/other.yaml", "--type", "ftp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown remote type"));
}

#[test]
fn test_add_package_shows_in_repositories() {
    let temp = TempDir::new().unwrap();
    burrow(temp.path())
        .args(["add", "package", "owner/tool", "tool", "--depends-on", "jq,yq"])
        .assert()
        .success();

    burrow(temp.path())
        .arg("repositories")
        .assert()
        .success()
        .stdout(predicate::str::contains("tool owner/tool (binary) depends on [jq, yq]"));

    burrow(temp.path())
        .args(["add", "package", "OWNER/tool", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_list_without_cache_and_auto_update_off() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.yaml"), "autoUpdate: false\nnotifyOutdatedVersions: false\n")
        .unwrap();

    burrow(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("The package list is empty"));
}

#[test]
fn test_info_unknown_package_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.yaml"), "autoUpdate: false\n").unwrap();

    burrow(temp.path())
        .args(["info", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find the package 'ghost'"))
        .stderr(predicate::str::contains("burrow update"));
}
