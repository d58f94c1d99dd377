#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_report(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("Failed to write report file");
}

pub fn write_tracker_config(dir: &Path, content: &str) {
    fs::write(dir.join("tracker.yaml"), content).expect("Failed to write tracker.yaml");
}

/// One class entry: name and (test name, status) pairs
pub fn class_yaml(name: &str, tests: &[(&str, &str)]) -> String {
    let tests = tests
        .iter()
        .map(|(test, status)| format!("      - name: {}\n        status: {}\n", test, status))
        .collect::<String>();
    format!("  - name: {}\n    tests:\n{}", name, tests)
}

pub fn report_yaml(full: bool, minute: u32, classes: &[String]) -> String {
    format!(
        r#"full: {}
started: 2024-01-15T10:{:02}:00Z
completed: 2024-01-15T10:{:02}:02Z
classes:
{}"#,
        full,
        minute,
        minute,
        if classes.is_empty() {
            "  []\n".to_string()
        } else {
            classes.concat()
        }
    )
}

/// A full run with one passing and one failing class
pub fn mixed_full_report() -> String {
    report_yaml(
        true,
        0,
        &[
            class_yaml("com.acme.AlphaTest", &[("works", "passed")]),
            class_yaml(
                "com.acme.BetaTest",
                &[("works", "passed"), ("broken", "failed")],
            ),
        ],
    )
}

/// A partial run that fixes the broken test
pub fn fixing_partial_report() -> String {
    report_yaml(
        false,
        1,
        &[class_yaml("com.acme.BetaTest", &[("broken", "passed")])],
    )
}
