mod common;

use common::*;
use std::process::Command;

fn cli_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_continuous-testing"))
}

#[test]
fn test_cli_help() {
    let output = cli_command().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Classify continuous test runs"));
    assert!(stdout.contains("summary"));
    assert!(stdout.contains("replay"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_cli_version() {
    let output = cli_command().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("continuous-testing"));
}

#[test]
fn test_cli_replay_help() {
    let output = cli_command().args(["replay", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Replay every report in a directory"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--filter"));
    assert!(stdout.contains("--json"));
}

#[test]
fn test_cli_summary_with_failures() {
    let dir = create_test_dir();
    write_report(dir.path(), "run.yaml", &mixed_full_report());

    let output = cli_command()
        .args(["summary", dir.path().join("run.yaml").to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Run 1 Results ==="));
    assert!(stdout.contains("✗ com.acme.BetaTest"));
    assert!(stdout.contains("    ✗ broken"));
    assert!(stdout.contains("✓ com.acme.AlphaTest"));
}

#[test]
fn test_cli_summary_json() {
    let dir = create_test_dir();
    write_report(dir.path(), "run.yaml", &mixed_full_report());

    let output = cli_command()
        .args(["summary", "--json", dir.path().join("run.yaml").to_str().unwrap()])
        .output()
        .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["currentFailedCount"], 1);
    assert_eq!(json["currentFailing"][0], "com.acme.BetaTest");
}

#[test]
fn test_cli_summary_missing_file() {
    let output = cli_command()
        .args(["summary", "/nonexistent/run.yaml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_replay_succeeds_after_fix() {
    let dir = create_test_dir();
    write_report(dir.path(), "001.yaml", &mixed_full_report());
    write_report(dir.path(), "002.yaml", &fixing_partial_report());

    let output = cli_command()
        .args(["replay", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Replaying 2 reports"));
    assert!(stdout.contains("=== Run 2 Results ==="));
    assert!(stdout.contains("✓ com.acme.AlphaTest (from run 1)"));
    assert!(stdout.contains("✓ com.acme.BetaTest"));
}

#[test]
fn test_cli_replay_filter() {
    let dir = create_test_dir();
    write_report(dir.path(), "001.yaml", &mixed_full_report());

    let output = cli_command()
        .args(["replay", dir.path().to_str().unwrap(), "-F", "Alpha"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ com.acme.AlphaTest"));
    assert!(!stdout.contains("✗ com.acme.BetaTest"));
}

#[test]
fn test_cli_replay_invalid_filter() {
    let dir = create_test_dir();
    write_report(dir.path(), "001.yaml", &mixed_full_report());

    let output = cli_command()
        .args(["replay", dir.path().to_str().unwrap(), "-F", "("])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_replay_empty_directory() {
    let dir = create_test_dir();

    let output = cli_command()
        .args(["replay", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_status() {
    let dir = create_test_dir();
    write_report(dir.path(), "001.yaml", &mixed_full_report());
    write_report(dir.path(), "002.yaml", &fixing_partial_report());

    let output = cli_command()
        .args(["status", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["lastRun"], 2);
    assert_eq!(json["running"], -1);
    assert_eq!(json["testsRun"], 1);
    assert_eq!(json["testsPassed"], 1);
    assert_eq!(json["totalTestsPassed"], 3);
    assert_eq!(json["totalTestsFailed"], 0);
}

#[test]
fn test_cli_validate() {
    let dir = create_test_dir();
    write_report(dir.path(), "001.yaml", &mixed_full_report());
    write_report(dir.path(), "002.yaml", "classes: [broken");

    let output = cli_command()
        .args(["validate", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(2 classes, 3 tests)"));
    assert!(stdout.contains("1 of 2 reports valid"));
}

#[test]
fn test_cli_status_container_failure_exits_nonzero() {
    let dir = create_test_dir();
    write_report(
        dir.path(),
        "001.yaml",
        r#"
full: true
started: 2024-01-15T10:00:00Z
completed: 2024-01-15T10:00:01Z
classes:
  - name: com.acme.SetupTest
    tests:
      - name: SetupTest
        status: failed
        test: false
"#,
    );

    let status = cli_command()
        .args(["status", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    let replay = cli_command()
        .args(["replay", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(1));
    assert_eq!(replay.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&status.stdout).unwrap();
    assert_eq!(json["totalTestsFailed"], 0);
}
