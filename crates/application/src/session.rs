//! An open collection and the mutations applied to it.

use arbor_domain::mutation::{self, MutationResult};
use arbor_domain::{Collection, Outcome, TreeError, TreeResult};
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, SyncConfig};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::PersistenceCollaborator;
use crate::sync::{PendingSet, SyncBridge};

/// Owns the current tree of one collection and keeps storage in step with it.
///
/// Every mutation computes a new tree, swaps it in before persisting, and then
/// runs the resulting commands through a [`SyncBridge`]. Mutating methods take
/// `&mut self`, so a session never has two mutations in flight.
///
/// When persistence fails the tree keeps the intended state and the touched
/// uids stay in [`pending`](Self::pending), unless the configured
/// [`FailurePolicy`] asks for a reload.
pub struct CollectionSession<P> {
    tree: Collection,
    bridge: SyncBridge<P>,
    pending: PendingSet,
    config: SyncConfig,
}

impl<P: PersistenceCollaborator> CollectionSession<P> {
    /// Wraps an already loaded tree.
    pub fn new(tree: Collection, persistence: P, config: SyncConfig) -> Self {
        Self {
            tree,
            bridge: SyncBridge::new(persistence, &config),
            pending: PendingSet::new(),
            config,
        }
    }

    /// The current tree.
    pub const fn tree(&self) -> &Collection {
        &self.tree
    }

    /// Uids whose persistence has not been confirmed.
    pub const fn pending(&self) -> &PendingSet {
        &self.pending
    }

    /// The persistence collaborator.
    pub const fn persistence(&self) -> &P {
        self.bridge.persistence()
    }

    /// The session settings.
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Handles a drop of `dragged_uid` onto `target_uid`.
    ///
    /// Dropping a folder into its own subtree is reported as `Unchanged`.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn move_item(
        &mut self,
        dragged_uid: &str,
        target_uid: &str,
    ) -> ApplicationResult<Outcome> {
        let result = mutation::move_item(&self.tree, dragged_uid, target_uid);
        self.commit("move", result).await
    }

    /// Moves an item to the top level of the collection.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn move_item_to_root(&mut self, uid: &str) -> ApplicationResult<Outcome> {
        let result = mutation::move_item_to_root(&self.tree, uid);
        self.commit("move-to-root", result).await
    }

    /// Duplicates an item next to the original.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn clone_item(
        &mut self,
        uid: &str,
        new_name: &str,
        new_filename: &str,
    ) -> ApplicationResult<Outcome> {
        let result = mutation::clone_item(&self.tree, uid, new_name, new_filename);
        self.commit("clone", result).await
    }

    /// Changes the display name and/or file name of an item.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn rename_item(
        &mut self,
        uid: &str,
        new_name: Option<&str>,
        new_filename: Option<&str>,
    ) -> ApplicationResult<Outcome> {
        let result = mutation::rename_item(&self.tree, uid, new_name, new_filename);
        self.commit("rename", result).await
    }

    /// Deletes an item and its subtree.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn delete_item(&mut self, uid: &str) -> ApplicationResult<Outcome> {
        let result = mutation::delete_item(&self.tree, uid);
        self.commit("delete", result).await
    }

    /// Creates a request inside `parent_uid`, or at the root for `None`.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn create_request(
        &mut self,
        parent_uid: Option<&str>,
        name: &str,
        filename: &str,
        payload: serde_json::Value,
    ) -> ApplicationResult<Outcome> {
        let result = mutation::create_request(&self.tree, parent_uid, name, filename, payload);
        self.commit("create-request", result).await
    }

    /// Creates an empty folder inside `parent_uid`, or at the root for `None`.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn create_folder(
        &mut self,
        parent_uid: Option<&str>,
        name: &str,
        dirname: &str,
    ) -> ApplicationResult<Outcome> {
        let result = mutation::create_folder(&self.tree, parent_uid, name, dirname);
        self.commit("create-folder", result).await
    }

    /// Closes `seq` gaps in one container.
    ///
    /// # Errors
    /// Tree errors from the mutation, or a persistence failure.
    pub async fn resequence(&mut self, container_uid: Option<&str>) -> ApplicationResult<Outcome> {
        let result = mutation::resequence(&self.tree, container_uid);
        self.commit("resequence", result).await
    }

    /// Replaces the tree with the one held by the persistence collaborator.
    ///
    /// # Errors
    /// Returns `ApplicationError::Persistence` if the tree cannot be loaded; the
    /// current tree is kept in that case.
    pub async fn resync(&mut self) -> ApplicationResult<()> {
        let root = self.tree.pathname.clone();
        let tree = self
            .bridge
            .persistence()
            .load_collection(&root)
            .await
            .map_err(|error| ApplicationError::Persistence {
                operation: "load".to_string(),
                reason: error.to_string(),
            })?;

        info!(root = %root, requests = tree.request_count(), "collection reloaded");
        self.tree = tree;
        self.pending.clear_all();
        Ok(())
    }

    async fn commit(
        &mut self,
        action: &'static str,
        computed: TreeResult<MutationResult>,
    ) -> ApplicationResult<Outcome> {
        let result = match computed {
            Ok(result) => result,
            Err(TreeError::InvalidMove { dragged, target }) => {
                debug!(action, %dragged, %target, "ignoring drop into own subtree");
                return Ok(Outcome::Unchanged);
            }
            Err(error) => return Err(error.into()),
        };

        if result.is_unchanged() {
            debug!(action, "nothing to change");
            return Ok(Outcome::Unchanged);
        }

        let affected = result.affected_uids();
        let MutationResult { tree, ops, .. } = result;
        debug!(action, ops = ops.len(), "mutation computed");

        self.tree = tree;
        self.pending.mark(&affected);

        match self.bridge.apply(&ops).await {
            Ok(issued) => {
                self.pending.clear(&affected);
                info!(action, ops = issued, "mutation persisted");
                Ok(Outcome::Applied)
            }
            Err(failure) => {
                warn!(
                    action,
                    completed = failure.completed,
                    total = failure.total,
                    error = %failure.error,
                    "persistence failed"
                );
                if self.config.on_failure == FailurePolicy::Resync {
                    warn!(action, "reloading collection after persistence failure");
                    if let Err(error) = self.resync().await {
                        warn!(action, %error, "reload failed, keeping in-memory tree");
                    }
                }
                Err(failure.error)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::MockPersistence;
    use arbor_domain::collection::find_item;
    use arbor_domain::{Folder, Item, Request};
    use pretty_assertions::assert_eq;

    /// /api
    /// ├── a.json (1)
    /// ├── b.json (2)
    /// ├── c.json (3)
    /// └── users/
    ///     └── admin/
    fn sample() -> Collection {
        let mut tree = Collection::new("API", "/api");
        tree.add_item(Request::new("A", "a.json", "/api", 1).into());
        tree.add_item(Request::new("B", "b.json", "/api", 2).into());
        tree.add_item(Request::new("C", "c.json", "/api", 3).into());
        let mut users = Folder::new("Users", "users", "/api");
        users.add_item(Folder::new("Admin", "admin", &users.pathname).into());
        tree.add_item(users.into());
        tree
    }

    fn uid_of(tree: &Collection, index: usize) -> String {
        tree.items[index].uid().to_string()
    }

    fn admin_uid(tree: &Collection) -> String {
        tree.items[3].children()[0].uid().to_string()
    }

    #[tokio::test]
    async fn test_move_persists_in_order() {
        let tree = sample();
        let (a, c) = (uid_of(&tree, 0), uid_of(&tree, 2));
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        let outcome = session.move_item(&c, &a).await.expect("move should succeed");
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            session.persistence().calls(),
            vec!["resequence /api/c.json=1,/api/a.json=2,/api/b.json=3"]
        );
        assert!(session.pending().is_empty());
        assert_eq!(find_item(session.tree(), &c).and_then(Item::seq), Some(1));
    }

    #[tokio::test]
    async fn test_invalid_move_is_silent_noop() {
        let tree = sample();
        let users = uid_of(&tree, 3);
        let admin = admin_uid(&tree);
        let before = tree.clone();
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        let outcome = session.move_item(&users, &admin).await.expect("drop should be ignored");
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(session.tree(), &before);
        assert!(session.persistence().calls().is_empty());
    }

    #[tokio::test]
    async fn test_structural_errors_block_everything() {
        let tree = sample();
        let before = tree.clone();
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        let error = session.delete_item("missing").await.expect_err("should fail");
        assert!(matches!(error, ApplicationError::Tree(TreeError::NotFound(_))));
        assert!(!error.is_persistence_failure());
        assert_eq!(session.tree(), &before);
        assert!(session.persistence().calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_optimistic_tree() {
        let tree = sample();
        let b = uid_of(&tree, 1);
        let mut session = CollectionSession::new(
            tree,
            MockPersistence::failing_on("delete"),
            SyncConfig::default(),
        );

        let error = session.delete_item(&b).await.expect_err("delete should fail");
        assert!(error.is_persistence_failure());
        assert!(find_item(session.tree(), &b).is_none());
        assert!(session.pending().contains(&b));
    }

    #[tokio::test]
    async fn test_failure_with_resync_reloads() {
        let tree = sample();
        let b = uid_of(&tree, 1);
        let persistence = MockPersistence::failing_on("delete").with_stored(tree.clone());
        let config = SyncConfig {
            on_failure: FailurePolicy::Resync,
            ..SyncConfig::default()
        };
        let mut session = CollectionSession::new(tree.clone(), persistence, config);

        let error = session.delete_item(&b).await.expect_err("delete should fail");
        assert!(matches!(error, ApplicationError::Persistence { .. }));
        assert_eq!(session.tree(), &tree);
        assert!(session.pending().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_resequence() {
        let tree = sample();
        let a = uid_of(&tree, 0);
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        session.delete_item(&a).await.expect("delete should succeed");
        let outcome = session.resequence(None).await.expect("resequence should succeed");
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            session.persistence().calls(),
            vec![
                "delete request /api/a.json",
                "resequence /api/b.json=1,/api/c.json=2",
            ]
        );
        assert_eq!(
            session.resequence(None).await.expect("second pass should succeed"),
            Outcome::Unchanged
        );
    }

    #[tokio::test]
    async fn test_clone_and_rename_folder() {
        let tree = sample();
        let users = uid_of(&tree, 3);
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        session
            .clone_item(&users, "Users copy", "users-copy")
            .await
            .expect("clone should succeed");
        session
            .rename_item(&users, Some("Members"), Some("members"))
            .await
            .expect("rename should succeed");

        assert_eq!(
            session.persistence().calls(),
            vec![
                "clone-folder /api/users-copy".to_string(),
                format!("rename {users} /api/users -> /api/members (Members)"),
            ]
        );
        assert_eq!(session.tree().items.len(), 5);
    }

    #[tokio::test]
    async fn test_create_items() {
        let tree = sample();
        let users = uid_of(&tree, 3);
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        session
            .create_folder(Some(&users), "Billing", "billing")
            .await
            .expect("folder should be created");
        session
            .create_request(None, "D", "d", serde_json::json!({ "method": "GET" }))
            .await
            .expect("request should be created");
        session
            .move_item_to_root(&admin_uid(session.tree()))
            .await
            .expect("move should succeed");

        assert_eq!(
            session.persistence().calls(),
            vec![
                "create /api/users/billing",
                "create /api/d.json",
                "move /api/users/admin -> /api",
            ]
        );
    }

    #[tokio::test]
    async fn test_resync_without_store_fails_softly() {
        let tree = sample();
        let before = tree.clone();
        let mut session = CollectionSession::new(tree, MockPersistence::new(), SyncConfig::default());

        assert!(session.resync().await.is_err());
        assert_eq!(session.tree(), &before);
    }
}
