//! Run results error types

/// Errors raised while assembling a [`TestRunResults`](super::TestRunResults)
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RunResultsError {
    #[error("Run {0} has no results mapping")]
    MissingResults(u64),

    #[error("Run {0} has no start time")]
    MissingStartTime(u64),

    #[error("Run {0} has no completion time")]
    MissingCompletionTime(u64),
}
