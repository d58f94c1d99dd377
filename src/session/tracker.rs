//! Run tracker - Owns the results state across consecutive test runs
//!
//! The tracker:
//! 1. Hands out monotonically increasing run ids
//! 2. Allows at most one run in flight
//! 3. Merges the classes executed by a pass into the state left by earlier runs
//! 4. Freezes the merged state into a [`TestRunResults`]
//! 5. Keeps a bounded history and notifies listeners and subscribers

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::config::TrackerConfig;
use super::listener::TestListener;
use super::report::{ExecutedClass, RunReport};
use crate::results::{RunSummary, TestClassResult, TestOutcome, TestRunResults, TestStatus};
use crate::scan::ClassScanResult;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Run {0} is still in progress")]
    RunInProgress(u64),

    #[error("Run {0} is not the run in progress")]
    UnknownRun(u64),

    #[error("Run ids exhausted, cannot start run {0}")]
    IdsExhausted(u64),
}

/// Largest id a run can take; status views report ids as signed integers
pub const MAX_RUN_ID: u64 = i64::MAX as u64;

/// Token for the run currently in flight
#[derive(Debug)]
pub struct PendingRun {
    id: u64,
    full: bool,
    trigger: Option<ClassScanResult>,
    started: DateTime<Utc>,
}

impl PendingRun {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn trigger(&self) -> Option<&ClassScanResult> {
        self.trigger.as_ref()
    }

    pub fn started_time(&self) -> DateTime<Utc> {
        self.started
    }
}

pub struct RunTracker {
    config: TrackerConfig,
    next_id: u64,
    running: Option<u64>,
    results: BTreeMap<String, Arc<TestClassResult>>,
    history: VecDeque<Arc<TestRunResults>>,
    listeners: Vec<Box<dyn TestListener>>,
    latest: watch::Sender<Option<Arc<TestRunResults>>>,
}

impl RunTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            next_id: config.first_run_id,
            config,
            running: None,
            results: BTreeMap::new(),
            history: VecDeque::new(),
            listeners: Vec::new(),
            latest,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn add_listener(&mut self, listener: Box<dyn TestListener>) {
        self.listeners.push(listener);
    }

    /// Receive every completed run; holds `None` until the first one
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<TestRunResults>>> {
        self.latest.subscribe()
    }

    /// Id of the run in flight, if any
    pub fn running(&self) -> Option<u64> {
        self.running
    }

    /// Per-class state after the last completed run
    pub fn results(&self) -> &BTreeMap<String, Arc<TestClassResult>> {
        &self.results
    }

    pub fn latest(&self) -> Option<Arc<TestRunResults>> {
        self.history.back().cloned()
    }

    /// Retained runs, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Arc<TestRunResults>> {
        self.history.iter()
    }

    pub fn run(&self, id: u64) -> Option<Arc<TestRunResults>> {
        self.history.iter().find(|r| r.id() == id).cloned()
    }

    pub fn status(&self) -> TestStatus {
        let last = self.history.back().map(|r| r.as_ref() as &dyn RunSummary);
        TestStatus::new(last, self.running)
    }

    /// Start a run now
    pub fn begin_run(
        &mut self,
        full: bool,
        trigger: Option<ClassScanResult>,
    ) -> Result<PendingRun, TrackerError> {
        self.begin_run_at(full, trigger, Utc::now())
    }

    /// Finish the run in flight now, with the classes it executed
    pub fn complete_run(
        &mut self,
        pending: PendingRun,
        executed: Vec<ExecutedClass>,
    ) -> Result<Arc<TestRunResults>, TrackerError> {
        self.complete_run_at(pending, executed, Utc::now())
    }

    /// Give up on the run in flight without recording anything
    pub fn abandon_run(&mut self, pending: PendingRun) -> Result<(), TrackerError> {
        if self.running != Some(pending.id) {
            warn!(run_id = pending.id, "Attempt to abandon a run that is not in flight");
            return Err(TrackerError::UnknownRun(pending.id));
        }
        info!(run_id = pending.id, "Test run abandoned");
        self.running = None;
        Ok(())
    }

    /// Record a finished pass using the timestamps of its report
    pub fn record(&mut self, report: RunReport) -> Result<Arc<TestRunResults>, TrackerError> {
        let pending = self.begin_run_at(report.full, report.trigger, report.started)?;
        self.complete_run_at(pending, report.classes, report.completed)
    }

    /// Forget all results and history; run ids keep increasing
    pub fn clear(&mut self) {
        info!(runs = self.history.len(), "Clearing test results");
        self.results.clear();
        self.history.clear();
        self.latest.send_replace(None);
        for listener in &self.listeners {
            listener.history_cleared();
        }
    }

    fn begin_run_at(
        &mut self,
        full: bool,
        trigger: Option<ClassScanResult>,
        started: DateTime<Utc>,
    ) -> Result<PendingRun, TrackerError> {
        if let Some(running) = self.running {
            warn!(run_id = running, "Test run requested while another is in flight");
            return Err(TrackerError::RunInProgress(running));
        }

        let id = self.next_id;
        if id > MAX_RUN_ID {
            warn!(run_id = id, "Run ids exhausted");
            return Err(TrackerError::IdsExhausted(id));
        }
        self.next_id = id + 1;
        self.running = Some(id);

        info!(run_id = id, full, "Test run started");
        for listener in &self.listeners {
            listener.run_started(id, full);
        }

        Ok(PendingRun {
            id,
            full,
            trigger,
            started,
        })
    }

    #[instrument(skip(self, pending, executed), fields(run_id = pending.id, classes = executed.len()))]
    fn complete_run_at(
        &mut self,
        pending: PendingRun,
        executed: Vec<ExecutedClass>,
        completed: DateTime<Utc>,
    ) -> Result<Arc<TestRunResults>, TrackerError> {
        if self.running != Some(pending.id) {
            warn!("Completion for a run that is not in flight");
            return Err(TrackerError::UnknownRun(pending.id));
        }

        let merged = self.merge(&pending, executed);
        let results = Arc::new(TestRunResults::new(
            pending.id,
            pending.trigger,
            pending.full,
            pending.started,
            completed,
            merged.clone(),
        ));

        self.results = merged;
        self.running = None;
        self.history.push_back(Arc::clone(&results));
        while self.history.len() > self.config.effective_history_limit() {
            self.history.pop_front();
        }

        info!(
            passed = results.current_passed_count(),
            failed = results.current_failed_count(),
            skipped = results.current_skipped_count(),
            failing_classes = results.failing().len(),
            "Test run completed"
        );

        self.latest.send_replace(Some(Arc::clone(&results)));
        for listener in &self.listeners {
            listener.run_complete(&results);
        }

        Ok(results)
    }

    /// Overlay the executed classes on the carried-over state
    ///
    /// A full run starts from nothing. A partial run keeps classes it did not
    /// execute, and inside an executed class keeps outcomes that were not
    /// re-executed.
    fn merge(
        &self,
        pending: &PendingRun,
        executed: Vec<ExecutedClass>,
    ) -> BTreeMap<String, Arc<TestClassResult>> {
        let mut merged = if pending.full {
            BTreeMap::new()
        } else {
            self.results.clone()
        };

        if self.config.drop_deleted_classes {
            if let Some(trigger) = &pending.trigger {
                for name in &trigger.deleted_class_names {
                    if merged.remove(name).is_some() {
                        debug!(class = %name, "Dropped results of deleted class");
                    }
                }
            }
        }

        for class in executed {
            let name = class.name.clone();
            let fresh = class.into_outcomes(pending.id);
            let result = match merged.get(&name) {
                Some(previous) => merge_class(&name, previous, fresh),
                None => TestClassResult::from_outcomes(name.as_str(), fresh),
            };
            merged.insert(name, Arc::new(result));
        }

        merged
    }
}

fn merge_class(name: &str, previous: &TestClassResult, fresh: Vec<TestOutcome>) -> TestClassResult {
    let retained: Vec<TestOutcome> = {
        let rerun: HashSet<&str> = fresh.iter().map(|o| o.unique_id.as_str()).collect();
        previous
            .outcomes()
            .filter(|o| !rerun.contains(o.unique_id.as_str()))
            .cloned()
            .collect()
    };
    debug!(class = %name, retained = retained.len(), rerun = fresh.len(), "Merged class results");
    TestClassResult::from_outcomes(name, retained.into_iter().chain(fresh))
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
