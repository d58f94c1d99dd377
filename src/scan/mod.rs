//! Source change scanning types
//!
//! Detecting changes is done elsewhere; this module only carries the
//! descriptor that a scan hands to the test runner.

pub mod class_scan;

pub use class_scan::ClassScanResult;
