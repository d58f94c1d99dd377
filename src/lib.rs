//! # Continuous Testing
//!
//! The results engine behind a live-reload test runner. Each time a source
//! change triggers a (possibly partial) test pass, the engine merges what
//! ran into the state left by earlier runs and classifies every test class
//! as failing, passing or skipped, split by whether this run touched it.
//!
//! ## Features
//!
//! - **Immutable run summaries** - [`TestRunResults`] is computed once and
//!   shared freely across threads
//! - **Current vs historic** - tell failures from this run apart from ones
//!   carried over from earlier runs
//! - **Run tracking** - [`RunTracker`] assigns run ids, merges partial passes
//!   and keeps a bounded history
//! - **Dashboard views** - serializable [`RunSnapshot`] and [`TestStatus`]
//!
//! ## Quick Start
//!
//! ```rust
//! use continuous_testing::prelude::*;
//!
//! let mut tracker = RunTracker::default();
//!
//! let pending = tracker.begin_run(true, None).unwrap();
//! let results = tracker
//!     .complete_run(
//!         pending,
//!         vec![ExecutedClass::new(
//!             "com.acme.GreetingTest",
//!             vec![
//!                 ExecutedTest::new("testHello", OutcomeStatus::Passed),
//!                 ExecutedTest::new("testGoodbye", OutcomeStatus::Failed),
//!             ],
//!         )],
//!     )
//!     .unwrap();
//!
//! assert_eq!(results.current_failed_count(), 1);
//! assert!(results.current_failing().contains_key("com.acme.GreetingTest"));
//! ```

pub mod results;
pub mod scan;
pub mod session;

// Re-export main types
pub use results::{
    ClassSnapshot, OutcomeStatus, RunResultsError, RunSnapshot, RunSummary, TestClassResult,
    TestOutcome, TestRunResults, TestRunResultsBuilder, TestStatus,
};
pub use scan::ClassScanResult;
pub use session::{
    ExecutedClass, ExecutedTest, LoadError, PendingRun, ReportLoader, RunReport, RunTracker,
    TestListener, TrackerConfig, TrackerError, MAX_RUN_ID,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::results::{
        OutcomeStatus, RunSnapshot, RunSummary, TestClassResult, TestOutcome, TestRunResults,
        TestStatus,
    };
    pub use crate::scan::ClassScanResult;
    pub use crate::session::{
        ExecutedClass, ExecutedTest, LoadError, ReportLoader, RunReport, RunTracker,
        TestListener, TrackerConfig,
    };
}
