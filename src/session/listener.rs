//! Run lifecycle listeners

use crate::results::TestRunResults;

/// Receives notifications as the tracker moves between runs
///
/// All methods default to doing nothing.
pub trait TestListener: Send + Sync {
    fn run_started(&self, _run_id: u64, _full: bool) {}

    fn run_complete(&self, _results: &TestRunResults) {}

    fn history_cleared(&self) {}
}
