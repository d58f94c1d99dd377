//! Change descriptors that trigger incremental runs

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The set of class changes picked up by one scan of the source tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassScanResult {
    /// Compiled class files whose contents changed
    pub changed_source_classes: BTreeSet<PathBuf>,
    pub deleted_source_classes: BTreeSet<PathBuf>,
    pub added_source_classes: BTreeSet<PathBuf>,

    /// Fully qualified names matching the file sets above
    pub changed_class_names: BTreeSet<String>,
    pub deleted_class_names: BTreeSet<String>,
    pub added_class_names: BTreeSet<String>,

    /// Whether a recompilation happened as part of the scan
    pub compilation_happened: bool,
}

impl ClassScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(mut self, class_name: impl Into<String>) -> Self {
        self.changed_class_names.insert(class_name.into());
        self
    }

    pub fn added(mut self, class_name: impl Into<String>) -> Self {
        self.added_class_names.insert(class_name.into());
        self
    }

    pub fn deleted(mut self, class_name: impl Into<String>) -> Self {
        self.deleted_class_names.insert(class_name.into());
        self
    }

    /// True if anything changed, was added or was removed
    pub fn is_changed(&self) -> bool {
        !self.changed_source_classes.is_empty()
            || !self.deleted_source_classes.is_empty()
            || !self.added_source_classes.is_empty()
            || !self.changed_class_names.is_empty()
            || !self.deleted_class_names.is_empty()
            || !self.added_class_names.is_empty()
    }

    /// Combine two scans into one, e.g. when changes pile up while a run is
    /// still in flight
    pub fn merge(mut self, other: ClassScanResult) -> Self {
        self.changed_source_classes.extend(other.changed_source_classes);
        self.deleted_source_classes.extend(other.deleted_source_classes);
        self.added_source_classes.extend(other.added_source_classes);
        self.changed_class_names.extend(other.changed_class_names);
        self.deleted_class_names.extend(other.deleted_class_names);
        self.added_class_names.extend(other.added_class_names);
        self.compilation_happened |= other.compilation_happened;
        self
    }

    /// Names of every class that was changed, added or deleted
    pub fn touched_class_names(&self) -> BTreeSet<&str> {
        self.changed_class_names
            .iter()
            .chain(&self.added_class_names)
            .chain(&self.deleted_class_names)
            .map(String::as_str)
            .collect()
    }
}
