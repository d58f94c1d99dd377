//! Read-only summary contract for a finished run
//!
//! Dashboards and status reporters depend on this trait rather than on the
//! concrete aggregate, so they can be fed any run summary.

use chrono::{DateTime, Duration, Utc};

pub trait RunSummary {
    fn id(&self) -> u64;

    fn started_time(&self) -> DateTime<Utc>;

    fn completed_time(&self) -> DateTime<Utc>;

    /// May be negative if the completion time precedes the start time
    fn total_time(&self) -> Duration {
        self.completed_time() - self.started_time()
    }

    fn passed_count(&self) -> u64;

    fn failed_count(&self) -> u64;

    fn skipped_count(&self) -> u64;

    fn current_passed_count(&self) -> u64;

    fn current_failed_count(&self) -> u64;

    fn current_skipped_count(&self) -> u64;

    fn total_count(&self) -> u64 {
        self.passed_count() + self.failed_count() + self.skipped_count()
    }

    fn current_total_count(&self) -> u64 {
        self.current_passed_count() + self.current_failed_count() + self.current_skipped_count()
    }
}
