//! Ordered execution of persistence commands.

use std::time::Duration;

use arbor_domain::PersistenceOp;
use thiserror::Error;
use tracing::debug;

use crate::config::SyncConfig;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{PersistenceCollaborator, PersistenceError};

/// A command list that stopped part way.
#[derive(Debug, Error)]
#[error("{error} ({completed} of {total} operations persisted)")]
pub struct SyncFailure {
    /// Commands that finished before the failure.
    pub completed: usize,
    /// Commands in the list.
    pub total: usize,
    /// The failure itself.
    #[source]
    pub error: ApplicationError,
}

/// Runs [`PersistenceOp`] lists against a [`PersistenceCollaborator`].
///
/// Commands run strictly in list order and each one is awaited before the
/// next starts. The first failure stops the list; nothing is retried.
pub struct SyncBridge<P> {
    persistence: P,
    timeout: Option<Duration>,
}

impl<P: PersistenceCollaborator> SyncBridge<P> {
    /// Creates a bridge using the timeout from `config`.
    pub fn new(persistence: P, config: &SyncConfig) -> Self {
        Self {
            persistence,
            timeout: config.persistence_timeout(),
        }
    }

    /// The wrapped collaborator.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Runs every command in order.
    ///
    /// Empty resequence batches are skipped and not counted. Returns the
    /// number of commands issued.
    ///
    /// # Errors
    /// Returns a [`SyncFailure`] describing the first command that failed or
    /// timed out.
    pub async fn apply(&self, ops: &[PersistenceOp]) -> Result<usize, SyncFailure> {
        let issued: Vec<&PersistenceOp> = ops.iter().filter(|op| !is_empty_batch(op)).collect();
        let total = issued.len();
        let mut completed = 0;
        for op in issued {
            debug!(operation = op.name(), "issuing persistence operation");
            if let Err(error) = self.run(op).await {
                return Err(SyncFailure {
                    completed,
                    total,
                    error,
                });
            }
            completed += 1;
        }
        Ok(completed)
    }

    async fn run(&self, op: &PersistenceOp) -> ApplicationResult<()> {
        let operation = op.name();
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.dispatch(op))
                .await
                .map_err(|_| ApplicationError::Timeout {
                    operation: operation.to_string(),
                })?,
            None => self.dispatch(op).await,
        };

        result.map_err(|error| ApplicationError::Persistence {
            operation: operation.to_string(),
            reason: error.to_string(),
        })
    }

    async fn dispatch(&self, op: &PersistenceOp) -> Result<(), PersistenceError> {
        match op {
            PersistenceOp::Move {
                old_path,
                new_parent_dir,
                kind,
                ..
            } => {
                self.persistence
                    .persist_move(old_path, new_parent_dir, *kind)
                    .await
            }
            PersistenceOp::Resequence(items) => self.persistence.persist_resequence(items).await,
            PersistenceOp::Rename {
                uid,
                old_path,
                new_path,
                new_name,
                new_filename,
            } => {
                self.persistence
                    .persist_rename(
                        uid,
                        old_path,
                        new_path,
                        new_name.as_deref(),
                        new_filename.as_deref(),
                    )
                    .await
            }
            PersistenceOp::Create { path, item } => {
                self.persistence.persist_create(path, item).await
            }
            PersistenceOp::Delete { path, kind, .. } => {
                self.persistence.persist_delete(path, *kind).await
            }
            PersistenceOp::CloneFolder { folder, dest_path } => {
                self.persistence
                    .persist_clone_folder(folder, dest_path)
                    .await
            }
        }
    }
}

fn is_empty_batch(op: &PersistenceOp) -> bool {
    matches!(op, PersistenceOp::Resequence(items) if items.is_empty())
}
