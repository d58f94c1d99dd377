//! Test session module
//!
//! This module contains:
//! - `tracker` - Run id assignment, result merging and run history
//! - `report` - Raw reports of a single test pass
//! - `loader` - Report file loading
//! - `config` - Tracker configuration
//! - `listener` - Run lifecycle listeners

pub mod config;
pub mod listener;
pub mod loader;
pub mod report;
pub mod tracker;

pub use config::TrackerConfig;
pub use listener::TestListener;
pub use loader::{LoadError, ReportLoader};
pub use report::{ExecutedClass, ExecutedTest, RunReport};
pub use tracker::{PendingRun, RunTracker, TrackerError, MAX_RUN_ID};
