//! Per-class test results

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::outcome::{OutcomeStatus, TestOutcome};

/// All outcomes recorded for one test class, split by status
///
/// Equality compares every field. Listing order comes from
/// [`TestClassResult::cmp_by_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestClassResult {
    class_name: String,
    passing: Vec<TestOutcome>,
    failing: Vec<TestOutcome>,
    skipped: Vec<TestOutcome>,
    latest_run_id: u64,
    duration_ms: u64,
}

impl TestClassResult {
    /// Create a class result; the latest run id is the highest run id of
    /// any contained outcome, or 0 when there are none
    pub fn new(
        class_name: impl Into<String>,
        passing: Vec<TestOutcome>,
        failing: Vec<TestOutcome>,
        skipped: Vec<TestOutcome>,
        duration_ms: u64,
    ) -> Self {
        let latest_run_id = passing
            .iter()
            .chain(&failing)
            .chain(&skipped)
            .map(TestOutcome::run_id)
            .max()
            .unwrap_or(0);

        Self {
            class_name: class_name.into(),
            passing,
            failing,
            skipped,
            latest_run_id,
            duration_ms,
        }
    }

    /// Partition a flat list of outcomes by status, keeping their order
    pub fn from_outcomes(
        class_name: impl Into<String>,
        outcomes: impl IntoIterator<Item = TestOutcome>,
    ) -> Self {
        let mut passing = Vec::new();
        let mut failing = Vec::new();
        let mut skipped = Vec::new();
        let mut duration_ms = 0;

        for outcome in outcomes {
            if outcome.is_test {
                duration_ms += outcome.duration_ms;
            }
            match outcome.status {
                OutcomeStatus::Passed => passing.push(outcome),
                OutcomeStatus::Failed => failing.push(outcome),
                OutcomeStatus::Skipped => skipped.push(outcome),
            }
        }

        Self::new(class_name, passing, failing, skipped, duration_ms)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn passing(&self) -> &[TestOutcome] {
        &self.passing
    }

    pub fn failing(&self) -> &[TestOutcome] {
        &self.failing
    }

    pub fn skipped(&self) -> &[TestOutcome] {
        &self.skipped
    }

    /// The most recent run that touched this class
    pub fn latest_run_id(&self) -> u64 {
        self.latest_run_id
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Every outcome, passing first, then failing, then skipped
    pub fn outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        self.passing.iter().chain(&self.failing).chain(&self.skipped)
    }

    pub fn is_empty(&self) -> bool {
        self.passing.is_empty() && self.failing.is_empty() && self.skipped.is_empty()
    }

    /// Listing order: class name only
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.class_name.cmp(&other.class_name)
    }
}
