//! Run-level aggregation of per-class test results
//!
//! A [`TestRunResults`] is built once from the class results left behind by a
//! finished (full or partial) test pass. Construction classifies every class:
//!
//! - **failing** if it has any failing outcome
//! - **passing** if it has passing outcomes but no failing ones
//! - **skipped** otherwise
//!
//! Failing and passing classes are further split into *current* (touched by
//! this run) and *historic* (carried over from an earlier run). The value is
//! never mutated after construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::class_result::TestClassResult;
use super::error::RunResultsError;
use super::summary::RunSummary;
use crate::scan::ClassScanResult;

/// Classified, queryable summary of a single test run
#[derive(Debug, Clone)]
pub struct TestRunResults {
    /// The run id
    id: u64,

    /// The change that triggered this run, if any
    trigger: Option<ClassScanResult>,

    /// If this ran all tests, or just the affected ones
    full: bool,

    started: DateTime<Utc>,
    completed: DateTime<Utc>,

    results: BTreeMap<String, Arc<TestClassResult>>,
    current_failing: BTreeMap<String, Arc<TestClassResult>>,
    historic_failing: BTreeMap<String, Arc<TestClassResult>>,
    current_passing: BTreeMap<String, Arc<TestClassResult>>,
    historic_passing: BTreeMap<String, Arc<TestClassResult>>,
    failing: Vec<Arc<TestClassResult>>,
    passing: Vec<Arc<TestClassResult>>,
    skipped: Vec<Arc<TestClassResult>>,

    passed_count: u64,
    failed_count: u64,
    skipped_count: u64,
    current_passed_count: u64,
    current_failed_count: u64,
    current_skipped_count: u64,
}

/// Running totals while walking the class results
#[derive(Default)]
struct Tally {
    passed: u64,
    failed: u64,
    skipped: u64,
    current_passed: u64,
    current_failed: u64,
    current_skipped: u64,
}

impl Tally {
    fn add(&mut self, class: &TestClassResult, run_id: u64) {
        self.passed += class.passing().iter().filter(|o| o.is_test()).count() as u64;
        self.failed += class.failing().iter().filter(|o| o.is_test()).count() as u64;
        self.skipped += class.skipped().iter().filter(|o| o.is_test()).count() as u64;
        self.current_passed += class.passing().iter().filter(|o| o.counts_for(run_id)).count() as u64;
        self.current_failed += class.failing().iter().filter(|o| o.counts_for(run_id)).count() as u64;
        self.current_skipped += class.skipped().iter().filter(|o| o.counts_for(run_id)).count() as u64;
    }
}

impl TestRunResults {
    /// Aggregate the class results of a finished run
    ///
    /// Keys are collected into a sorted map first; a duplicated class name
    /// keeps the last value supplied.
    pub fn new<I, K, V>(
        id: u64,
        trigger: Option<ClassScanResult>,
        full: bool,
        started: DateTime<Utc>,
        completed: DateTime<Utc>,
        results: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arc<TestClassResult>>,
    {
        let results: BTreeMap<String, Arc<TestClassResult>> = results
            .into_iter()
            .map(|(name, class)| (name.into(), class.into()))
            .collect();

        let mut tally = Tally::default();
        let mut current_failing = BTreeMap::new();
        let mut historic_failing = BTreeMap::new();
        let mut current_passing = BTreeMap::new();
        let mut historic_passing = BTreeMap::new();
        let mut failing = Vec::new();
        let mut passing = Vec::new();
        let mut skipped = Vec::new();

        for (name, class) in &results {
            tally.add(class, id);

            let current = class.latest_run_id() == id;
            if !class.failing().is_empty() {
                let bucket = if current { &mut current_failing } else { &mut historic_failing };
                bucket.insert(name.clone(), Arc::clone(class));
                failing.push(Arc::clone(class));
            } else if !class.passing().is_empty() {
                let bucket = if current { &mut current_passing } else { &mut historic_passing };
                bucket.insert(name.clone(), Arc::clone(class));
                passing.push(Arc::clone(class));
            } else {
                skipped.push(Arc::clone(class));
            }
        }

        // Stable: classes sharing a name stay in key order.
        failing.sort_by(|a, b| a.cmp_by_name(b));
        passing.sort_by(|a, b| a.cmp_by_name(b));
        skipped.sort_by(|a, b| a.cmp_by_name(b));

        Self {
            id,
            trigger,
            full,
            started,
            completed,
            results,
            current_failing,
            historic_failing,
            current_passing,
            historic_passing,
            failing,
            passing,
            skipped,
            passed_count: tally.passed,
            failed_count: tally.failed,
            skipped_count: tally.skipped,
            current_passed_count: tally.current_passed,
            current_failed_count: tally.current_failed,
            current_skipped_count: tally.current_skipped,
        }
    }

    /// Start a builder for a run with the given id
    pub fn builder(id: u64) -> TestRunResultsBuilder {
        TestRunResultsBuilder::new(id)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The change that triggered this run; `None` for untriggered full runs
    pub fn trigger(&self) -> Option<&ClassScanResult> {
        self.trigger.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn started_time(&self) -> DateTime<Utc> {
        self.started
    }

    pub fn completed_time(&self) -> DateTime<Utc> {
        self.completed
    }

    /// Completion minus start; negative values are reported as-is
    pub fn total_time(&self) -> Duration {
        self.completed - self.started
    }

    /// Every class known after this run
    pub fn results(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.results
    }

    pub fn class_result(&self, class_name: &str) -> Option<&TestClassResult> {
        self.results.get(class_name).map(Arc::as_ref)
    }

    pub fn current_failing(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.current_failing
    }

    pub fn historic_failing(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.historic_failing
    }

    pub fn current_passing(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.current_passing
    }

    pub fn historic_passing(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.historic_passing
    }

    /// Failing classes, current and historic, in class order
    pub fn failing(&self) -> &[Arc<TestClassResult>] {
        &self.failing
    }

    pub fn passing(&self) -> &[Arc<TestClassResult>] {
        &self.passing
    }

    pub fn skipped(&self) -> &[Arc<TestClassResult>] {
        &self.skipped
    }

    pub fn has_failures(&self) -> bool {
        !self.failing.is_empty()
    }

    pub fn passed_count(&self) -> u64 {
        self.passed_count
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count
    }

    pub fn current_passed_count(&self) -> u64 {
        self.current_passed_count
    }

    pub fn current_failed_count(&self) -> u64 {
        self.current_failed_count
    }

    pub fn current_skipped_count(&self) -> u64 {
        self.current_skipped_count
    }

    pub fn total_count(&self) -> u64 {
        self.passed_count + self.failed_count + self.skipped_count
    }

    pub fn current_total_count(&self) -> u64 {
        self.current_passed_count + self.current_failed_count + self.current_skipped_count
    }
}

impl RunSummary for TestRunResults {
    fn id(&self) -> u64 {
        self.id
    }

    fn started_time(&self) -> DateTime<Utc> {
        self.started
    }

    fn completed_time(&self) -> DateTime<Utc> {
        self.completed
    }

    fn passed_count(&self) -> u64 {
        self.passed_count
    }

    fn failed_count(&self) -> u64 {
        self.failed_count
    }

    fn skipped_count(&self) -> u64 {
        self.skipped_count
    }

    fn current_passed_count(&self) -> u64 {
        self.current_passed_count
    }

    fn current_failed_count(&self) -> u64 {
        self.current_failed_count
    }

    fn current_skipped_count(&self) -> u64 {
        self.current_skipped_count
    }
}

/// Builder for [`TestRunResults`] that rejects missing required inputs
#[derive(Debug, Default)]
pub struct TestRunResultsBuilder {
    id: u64,
    trigger: Option<ClassScanResult>,
    full: bool,
    started: Option<DateTime<Utc>>,
    completed: Option<DateTime<Utc>>,
    results: Option<BTreeMap<String, Arc<TestClassResult>>>,
}

impl TestRunResultsBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn trigger(mut self, trigger: Option<ClassScanResult>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    pub fn started(mut self, started: DateTime<Utc>) -> Self {
        self.started = Some(started);
        self
    }

    pub fn completed(mut self, completed: DateTime<Utc>) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn results<I, K, V>(mut self, results: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arc<TestClassResult>>,
    {
        self.results = Some(
            results
                .into_iter()
                .map(|(name, class)| (name.into(), class.into()))
                .collect(),
        );
        self
    }

    pub fn build(self) -> Result<TestRunResults, RunResultsError> {
        let results = self.results.ok_or(RunResultsError::MissingResults(self.id))?;
        let started = self.started.ok_or(RunResultsError::MissingStartTime(self.id))?;
        let completed = self
            .completed
            .ok_or(RunResultsError::MissingCompletionTime(self.id))?;

        Ok(TestRunResults::new(
            self.id,
            self.trigger,
            self.full,
            started,
            completed,
            results,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::outcome::{OutcomeStatus, TestOutcome};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn outcome(class: &str, name: &str, status: OutcomeStatus, run_id: u64) -> TestOutcome {
        TestOutcome::new(class, name, status, run_id)
    }

    fn class(name: &str, outcomes: Vec<TestOutcome>) -> TestClassResult {
        TestClassResult::from_outcomes(name, outcomes)
    }

    fn run(id: u64, classes: Vec<TestClassResult>) -> TestRunResults {
        TestRunResults::new(
            id,
            None,
            false,
            at(0),
            at(10),
            classes
                .into_iter()
                .map(|c| (c.class_name().to_string(), c)),
        )
    }

    #[test]
    fn test_current_failing_class() {
        let results = run(
            5,
            vec![class("Foo", vec![outcome("Foo", "t1", OutcomeStatus::Failed, 5)])],
        );

        assert!(results.current_failing().contains_key("Foo"));
        assert!(results.historic_failing().is_empty());
        assert_eq!(results.current_failed_count(), 1);
        assert_eq!(results.failed_count(), 1);
        assert_eq!(results.passed_count(), 0);
    }

    #[test]
    fn test_historic_failing_class() {
        let results = run(
            5,
            vec![class("Foo", vec![outcome("Foo", "t1", OutcomeStatus::Failed, 3)])],
        );

        assert!(results.historic_failing().contains_key("Foo"));
        assert!(results.current_failing().is_empty());
        assert_eq!(results.current_failed_count(), 0);
        assert_eq!(results.failed_count(), 1);
    }

    #[test]
    fn test_empty_results() {
        let results = run(1, vec![]);

        assert_eq!(results.total_count(), 0);
        assert_eq!(results.current_total_count(), 0);
        assert!(results.failing().is_empty());
        assert!(results.passing().is_empty());
        assert!(results.skipped().is_empty());
        assert!(!results.has_failures());
    }

    #[test]
    fn test_container_outcome_not_counted() {
        let results = run(
            1,
            vec![class(
                "Foo",
                vec![TestOutcome::container("Foo", OutcomeStatus::Passed, 1)],
            )],
        );

        assert_eq!(results.passed_count(), 0);
        assert_eq!(results.passing().len(), 1);
        assert!(results.current_passing().contains_key("Foo"));
    }

    #[test]
    fn test_failing_takes_priority_over_passing() {
        let results = run(
            2,
            vec![class(
                "Mixed",
                vec![
                    outcome("Mixed", "ok", OutcomeStatus::Passed, 2),
                    outcome("Mixed", "bad", OutcomeStatus::Failed, 2),
                ],
            )],
        );

        assert_eq!(results.failing().len(), 1);
        assert!(results.passing().is_empty());
        assert_eq!(results.passed_count(), 1);
        assert_eq!(results.failed_count(), 1);
    }

    #[test]
    fn test_skipped_only_class() {
        let results = run(
            2,
            vec![class("Skip", vec![outcome("Skip", "s", OutcomeStatus::Skipped, 1)])],
        );

        assert_eq!(results.skipped().len(), 1);
        assert_eq!(results.skipped_count(), 1);
        assert_eq!(results.current_skipped_count(), 0);
        assert!(results.current_passing().is_empty());
        assert!(results.historic_passing().is_empty());
    }

    #[test]
    fn test_flat_sequences_sorted() {
        let results = run(
            1,
            vec![
                class("c.Third", vec![outcome("c.Third", "t", OutcomeStatus::Failed, 1)]),
                class("a.First", vec![outcome("a.First", "t", OutcomeStatus::Failed, 0)]),
                class("b.Second", vec![outcome("b.Second", "t", OutcomeStatus::Failed, 1)]),
            ],
        );

        let names: Vec<_> = results.failing().iter().map(|c| c.class_name()).collect();
        assert_eq!(names, vec!["a.First", "b.Second", "c.Third"]);
        assert_eq!(results.current_failing().len(), 2);
        assert_eq!(results.historic_failing().len(), 1);
    }

    #[test]
    fn test_negative_total_time() {
        let results = TestRunResults::new(
            1,
            None,
            true,
            at(10),
            at(4),
            Vec::<(String, TestClassResult)>::new(),
        );

        assert_eq!(results.total_time(), Duration::seconds(-6));
    }

    #[test]
    fn test_builder_requires_results() {
        let err = TestRunResults::builder(4)
            .started(at(0))
            .completed(at(1))
            .build()
            .unwrap_err();

        assert_eq!(err, RunResultsError::MissingResults(4));
    }

    #[test]
    fn test_builder_requires_timestamps() {
        let err = TestRunResults::builder(4)
            .results(Vec::<(String, TestClassResult)>::new())
            .completed(at(1))
            .build()
            .unwrap_err();
        assert_eq!(err, RunResultsError::MissingStartTime(4));

        let err = TestRunResults::builder(4)
            .results(Vec::<(String, TestClassResult)>::new())
            .started(at(1))
            .build()
            .unwrap_err();
        assert_eq!(err, RunResultsError::MissingCompletionTime(4));
    }

    #[test]
    fn test_builder_builds() {
        let results = TestRunResults::builder(9)
            .full(true)
            .started(at(0))
            .completed(at(3))
            .results([(
                "Foo",
                class("Foo", vec![outcome("Foo", "t", OutcomeStatus::Passed, 9)]),
            )])
            .build()
            .unwrap();

        assert_eq!(results.id(), 9);
        assert!(results.is_full());
        assert!(results.trigger().is_none());
        assert_eq!(results.current_passed_count(), 1);
        assert_eq!(results.total_time(), Duration::seconds(3));
    }

    #[test]
    fn test_summary_trait_matches_accessors() {
        let results = run(
            3,
            vec![
                class("A", vec![outcome("A", "a", OutcomeStatus::Passed, 3)]),
                class("B", vec![outcome("B", "b", OutcomeStatus::Failed, 2)]),
            ],
        );
        let summary: &dyn RunSummary = &results;

        assert_eq!(summary.id(), 3);
        assert_eq!(summary.total_count(), results.total_count());
        assert_eq!(summary.current_total_count(), 1);
        assert_eq!(summary.total_time(), results.total_time());
    }
}
