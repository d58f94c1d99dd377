//! Tracker configuration
//!
//! Loaded from tracker.yaml:
//!
//! ```yaml
//! history_limit: 20
//! first_run_id: 1
//! drop_deleted_classes: true
//! ```

use serde::{Deserialize, Serialize};

use super::loader::LoadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Number of completed runs kept in memory, at least one is always kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Id handed to the first run
    #[serde(default = "default_first_run_id")]
    pub first_run_id: u64,

    /// Forget results of classes the trigger reports as deleted
    #[serde(default = "default_drop_deleted_classes")]
    pub drop_deleted_classes: bool,
}

fn default_history_limit() -> usize {
    10
}

fn default_first_run_id() -> u64 {
    1
}

fn default_drop_deleted_classes() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            first_run_id: default_first_run_id(),
            drop_deleted_classes: default_drop_deleted_classes(),
        }
    }
}

impl TrackerConfig {
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: TrackerConfig = serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })?;
        Ok(config)
    }

    pub(crate) fn effective_history_limit(&self) -> usize {
        self.history_limit.max(1)
    }
}
