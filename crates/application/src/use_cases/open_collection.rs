//! Open collection use case.

use tracing::{info, warn};

use arbor_domain::collection::invariants::{duplicate_uids, sequence_gaps};

use crate::config::SyncConfig;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::PersistenceCollaborator;
use crate::session::CollectionSession;

/// Loads a collection and starts a session on it.
pub struct OpenCollection<P> {
    persistence: P,
    config: SyncConfig,
}

impl<P: PersistenceCollaborator> OpenCollection<P> {
    /// Creates a new `OpenCollection` use case.
    pub const fn new(persistence: P, config: SyncConfig) -> Self {
        Self {
            persistence,
            config,
        }
    }

    /// Loads the tree rooted at `root` and hands the collaborator to a session.
    ///
    /// # Errors
    /// Returns `ApplicationError::Config` for unusable settings and
    /// `ApplicationError::Persistence` if the tree cannot be loaded.
    pub async fn execute(self, root: &str) -> ApplicationResult<CollectionSession<P>> {
        self.config.validate()?;

        let tree = self
            .persistence
            .load_collection(root)
            .await
            .map_err(|error| ApplicationError::Persistence {
                operation: "load".to_string(),
                reason: error.to_string(),
            })?;

        for uid in duplicate_uids(&tree) {
            warn!(%uid, "uid used by more than one item");
        }
        for gap in sequence_gaps(&tree) {
            warn!(container = %gap.container, found = ?gap.found, "request order has gaps");
        }
        info!(root, name = %tree.name, requests = tree.request_count(), "collection opened");

        Ok(CollectionSession::new(tree, self.persistence, self.config))
    }
}
