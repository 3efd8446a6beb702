//! Integration tests for the gcetools command surface and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn gcetools() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gcetools"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    gcetools().assert().code(2).stderr(predicate::str::contains(
        "Compute Engine inventory for task-runner roles",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    gcetools()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("roles"))
        .stdout(predicate::str::contains("instance"))
        .stdout(predicate::str::contains("group"))
        .stdout(predicate::str::contains("pool"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    gcetools()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gcetools"));
}

#[test]
fn test_version_command_shows_version() {
    gcetools()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "gcetools ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = gcetools()
        .args(["version", "--json"])
        .output()
        .expect("run gcetools");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version --json is JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

// --- Argument validation ---

#[test]
fn test_pool_add_requires_zone() {
    gcetools()
        .args(["pool", "add", "www", "web1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<ZONE>"));
}

#[test]
fn test_group_region_conflicts_with_zone() {
    gcetools()
        .args(["group", "api", "--region", "r", "--zone", "z"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_subcommand_fails() {
    gcetools()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
