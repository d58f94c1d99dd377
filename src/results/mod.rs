//! Test results module
//!
//! This module contains:
//! - `outcome` - Individual test outcomes
//! - `class_result` - Per-class results split by status
//! - `run_results` - The run-level aggregate and its builder
//! - `summary` - Read-only summary contract consumed by tooling
//! - `snapshot` - Serializable run and status views
//! - `error` - Construction error types

pub mod class_result;
pub mod error;
pub mod outcome;
pub mod run_results;
pub mod snapshot;
pub mod summary;

pub use class_result::TestClassResult;
pub use error::RunResultsError;
pub use outcome::{OutcomeStatus, TestOutcome};
pub use run_results::{TestRunResults, TestRunResultsBuilder};
pub use snapshot::{ClassSnapshot, RunSnapshot, TestStatus};
pub use summary::RunSummary;
