//! Synchronization settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApplicationError, ApplicationResult};

/// What a session does with its in-memory tree when persistence fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep the intended tree and leave the affected uids marked pending.
    #[default]
    KeepOptimistic,
    /// Reload the tree from the persistence collaborator.
    Resync,
}

/// Settings for the synchronization bridge and collection sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Per-operation limit in milliseconds; `None` waits indefinitely.
    pub persistence_timeout_ms: Option<u64>,
    /// Reaction to a failed persistence operation.
    pub on_failure: FailurePolicy,
}

impl SyncConfig {
    /// The per-operation limit as a [`Duration`].
    #[must_use]
    pub fn persistence_timeout(&self) -> Option<Duration> {
        self.persistence_timeout_ms.map(Duration::from_millis)
    }

    /// Checks the settings for values that cannot work.
    ///
    /// # Errors
    /// Returns `ApplicationError::Config` for a zero timeout.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.persistence_timeout_ms == Some(0) {
            return Err(ApplicationError::Config(
                "persistence_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
