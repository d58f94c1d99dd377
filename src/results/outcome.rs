//! Individual test outcomes

use serde::{Deserialize, Serialize};

/// How a single test (or test container) finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Skipped,
}

/// The result of one executed test method or test container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// Human readable name, e.g. the method name
    pub display_name: String,

    /// Class the outcome belongs to
    pub test_class: String,

    /// Stable identity of the test across runs
    pub unique_id: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub status: OutcomeStatus,

    /// False for class-level pseudo-results (containers)
    #[serde(default = "default_is_test")]
    pub is_test: bool,

    /// The run that recorded this outcome
    pub run_id: u64,

    #[serde(default)]
    pub duration_ms: u64,

    /// Failure messages and stack traces
    #[serde(default)]
    pub problems: Vec<String>,

    /// Captured output while the test ran
    #[serde(default)]
    pub log_output: Vec<String>,
}

fn default_is_test() -> bool {
    true
}

impl TestOutcome {
    /// Create a test-method outcome with no timing, tags or problems
    pub fn new(
        test_class: impl Into<String>,
        display_name: impl Into<String>,
        status: OutcomeStatus,
        run_id: u64,
    ) -> Self {
        let test_class = test_class.into();
        let display_name = display_name.into();
        Self {
            unique_id: format!("{}#{}", test_class, display_name),
            display_name,
            test_class,
            tags: Vec::new(),
            status,
            is_test: true,
            run_id,
            duration_ms: 0,
            problems: Vec::new(),
            log_output: Vec::new(),
        }
    }

    /// Create a class-level container outcome
    pub fn container(test_class: impl Into<String>, status: OutcomeStatus, run_id: u64) -> Self {
        let test_class = test_class.into();
        Self {
            unique_id: test_class.clone(),
            display_name: test_class.clone(),
            test_class,
            tags: Vec::new(),
            status,
            is_test: false,
            run_id,
            duration_ms: 0,
            problems: Vec::new(),
            log_output: Vec::new(),
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problems.push(problem.into());
        self
    }

    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Whether this outcome counts towards the given run
    pub(crate) fn counts_for(&self, run_id: u64) -> bool {
        self.is_test && self.run_id == run_id
    }
}
