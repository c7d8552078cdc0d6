//! Tests for the 'sweep' command

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper function to create a command instance for the reno-cli binary
fn cli_command() -> Command {
    Command::cargo_bin("reno-cli").expect("Failed to find reno-cli binary")
}

#[test]
fn test_cli_sweep_alpha_table() {
    let mut cmd = cli_command();
    cmd.args(["sweep", "alpha", "--rounds", "20"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("Throughput (KB/s)"));
}

#[test]
fn test_cli_sweep_beta_json() {
    let mut cmd = cli_command();
    cmd.args(["sweep", "beta", "--rounds", "20", "--json"]);

    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());

    let points: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("stdout should be a JSON array");
    assert_eq!(points.len(), 5);
    assert_eq!(points[0]["alpha"], 1.0);
    assert_eq!(points[0]["beta"], 0.5);
    assert_eq!(points[4]["beta"], 0.9);
}

#[test]
fn test_cli_sweep_rejects_unknown_kind() {
    let mut cmd = cli_command();
    cmd.args(["sweep", "gamma"]);

    cmd.assert().failure().code(2);
}
