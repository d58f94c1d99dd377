//! Serializable views of a run for dashboards and other tooling

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::class_result::TestClassResult;
use super::outcome::TestOutcome;
use super::run_results::TestRunResults;
use super::summary::RunSummary;

/// One class as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    pub name: String,
    /// Whether the class was touched by the run being shown
    pub current: bool,
    pub latest_run_id: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl ClassSnapshot {
    fn of(class: &TestClassResult, run_id: u64) -> Self {
        let tests = |outcomes: &[TestOutcome]| {
            outcomes.iter().filter(|o| o.is_test()).count() as u64
        };
        Self {
            name: class.class_name().to_string(),
            current: class.latest_run_id() == run_id,
            latest_run_id: class.latest_run_id(),
            passed: tests(class.passing()),
            failed: tests(class.failing()),
            skipped: tests(class.skipped()),
        }
    }
}

/// Snapshot of a [`TestRunResults`] for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub id: u64,
    pub full: bool,
    pub started: DateTime<Utc>,
    pub completed: DateTime<Utc>,
    pub total_time_ms: i64,

    pub passed_count: u64,
    pub failed_count: u64,
    pub skipped_count: u64,
    pub current_passed_count: u64,
    pub current_failed_count: u64,
    pub current_skipped_count: u64,

    pub failing: Vec<ClassSnapshot>,
    pub passing: Vec<ClassSnapshot>,
    pub skipped: Vec<ClassSnapshot>,

    pub current_failing: Vec<String>,
    pub historic_failing: Vec<String>,
    pub current_passing: Vec<String>,
    pub historic_passing: Vec<String>,
}

impl From<&TestRunResults> for RunSnapshot {
    fn from(run: &TestRunResults) -> Self {
        let id = run.id();
        let classes = |list: &[Arc<TestClassResult>]| -> Vec<ClassSnapshot> {
            list.iter().map(|c| ClassSnapshot::of(c, id)).collect()
        };
        Self {
            id,
            full: run.is_full(),
            started: run.started_time(),
            completed: run.completed_time(),
            total_time_ms: run.total_time().num_milliseconds(),
            passed_count: run.passed_count(),
            failed_count: run.failed_count(),
            skipped_count: run.skipped_count(),
            current_passed_count: run.current_passed_count(),
            current_failed_count: run.current_failed_count(),
            current_skipped_count: run.current_skipped_count(),
            failing: classes(run.failing()),
            passing: classes(run.passing()),
            skipped: classes(run.skipped()),
            current_failing: run.current_failing().keys().cloned().collect(),
            historic_failing: run.historic_failing().keys().cloned().collect(),
            current_passing: run.current_passing().keys().cloned().collect(),
            historic_passing: run.historic_passing().keys().cloned().collect(),
        }
    }
}

/// Compact status line shown by dashboards
///
/// `tests_*` are counts from the last run only, `total_tests_*` include
/// results carried over from earlier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStatus {
    /// Id of the last completed run, -1 if none
    pub last_run: i64,
    /// Id of the run in flight, -1 if idle
    pub running: i64,
    pub tests_run: u64,
    pub tests_passed: u64,
    pub tests_failed: u64,
    pub tests_skipped: u64,
    pub total_tests_passed: u64,
    pub total_tests_failed: u64,
    pub total_tests_skipped: u64,
}

impl Default for TestStatus {
    fn default() -> Self {
        Self {
            last_run: -1,
            running: -1,
            tests_run: 0,
            tests_passed: 0,
            tests_failed: 0,
            tests_skipped: 0,
            total_tests_passed: 0,
            total_tests_failed: 0,
            total_tests_skipped: 0,
        }
    }
}

impl TestStatus {
    pub fn new(last: Option<&dyn RunSummary>, running: Option<u64>) -> Self {
        let running = running.map_or(-1, signed_id);
        match last {
            None => Self {
                running,
                ..Default::default()
            },
            Some(run) => Self {
                last_run: signed_id(run.id()),
                running,
                tests_run: run.current_total_count(),
                tests_passed: run.current_passed_count(),
                tests_failed: run.current_failed_count(),
                tests_skipped: run.current_skipped_count(),
                total_tests_passed: run.passed_count(),
                total_tests_failed: run.failed_count(),
                total_tests_skipped: run.skipped_count(),
            },
        }
    }
}

/// Ids past `i64::MAX` saturate so they never read as the -1 sentinel
fn signed_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}
