//! Raw reports of a single test pass
//!
//! A report lists the classes that were actually executed by one pass, with
//! no run ids attached. The tracker assigns the id and merges the report into
//! the results carried over from earlier runs.
//!
//! ```yaml
//! full: false
//! started: 2024-01-15T10:30:00Z
//! completed: 2024-01-15T10:30:02Z
//! trigger:
//!   changed_class_names: [com.acme.Greeting]
//! classes:
//!   - name: com.acme.GreetingTest
//!     tests:
//!       - name: testHello
//!         status: passed
//!         duration_ms: 12
//!       - name: testGoodbye
//!         status: failed
//!         problems: ["expected <bye> but was <hello>"]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::{OutcomeStatus, TestClassResult, TestOutcome};
use crate::scan::ClassScanResult;

/// Everything one test pass produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// If all tests ran, or just the affected ones
    #[serde(default)]
    pub full: bool,

    #[serde(default)]
    pub trigger: Option<ClassScanResult>,

    pub started: DateTime<Utc>,
    pub completed: DateTime<Utc>,

    #[serde(default)]
    pub classes: Vec<ExecutedClass>,
}

/// One class executed during the pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedClass {
    pub name: String,

    #[serde(default)]
    pub tests: Vec<ExecutedTest>,
}

/// One test (or container) executed during the pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedTest {
    pub name: String,

    /// Defaults to `<class>#<name>`
    #[serde(default)]
    pub unique_id: Option<String>,

    pub status: OutcomeStatus,

    /// False for class-level container results
    #[serde(default = "default_test")]
    pub test: bool,

    #[serde(default)]
    pub duration_ms: u64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub problems: Vec<String>,

    #[serde(default)]
    pub log_output: Vec<String>,
}

fn default_test() -> bool {
    true
}

impl ExecutedTest {
    pub fn new(name: impl Into<String>, status: OutcomeStatus) -> Self {
        Self {
            name: name.into(),
            unique_id: None,
            status,
            test: true,
            duration_ms: 0,
            tags: Vec::new(),
            problems: Vec::new(),
            log_output: Vec::new(),
        }
    }

    fn into_outcome(self, class_name: &str, run_id: u64) -> TestOutcome {
        let unique_id = self
            .unique_id
            .unwrap_or_else(|| format!("{}#{}", class_name, self.name));
        TestOutcome {
            display_name: self.name,
            test_class: class_name.to_string(),
            unique_id,
            tags: self.tags,
            status: self.status,
            is_test: self.test,
            run_id,
            duration_ms: self.duration_ms,
            problems: self.problems,
            log_output: self.log_output,
        }
    }
}

impl ExecutedClass {
    pub fn new(name: impl Into<String>, tests: Vec<ExecutedTest>) -> Self {
        Self {
            name: name.into(),
            tests,
        }
    }

    /// Stamp every executed test with the run id
    pub fn into_outcomes(self, run_id: u64) -> Vec<TestOutcome> {
        let name = self.name;
        self.tests
            .into_iter()
            .map(|t| t.into_outcome(&name, run_id))
            .collect()
    }

    /// Class result holding only what this pass produced
    pub fn into_class_result(self, run_id: u64) -> TestClassResult {
        let name = self.name.clone();
        TestClassResult::from_outcomes(name, self.into_outcomes(run_id))
    }
}
