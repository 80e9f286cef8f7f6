//! In-memory persistence collaborator for tests.

#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::time::Duration;

use arbor_domain::{Collection, Folder, Item, ItemKind, SeqAssignment};
use async_trait::async_trait;

use crate::ports::{PersistenceCollaborator, PersistenceError};

/// Records every call as a line of text and can fail or stall on demand.
pub struct MockPersistence {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
    delay: Option<Duration>,
    stored: Mutex<Option<Collection>>,
}

impl MockPersistence {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            delay: None,
            stored: Mutex::new(None),
        }
    }

    /// Fails every call of the named operation.
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::new()
        }
    }

    /// Sleeps before answering each call.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Sets the tree returned by `load_collection`.
    pub fn with_stored(self, tree: Collection) -> Self {
        *self.stored.lock().expect("Lock poisoned") = Some(tree);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    async fn record(&self, operation: &'static str, detail: String) -> Result<(), PersistenceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on == Some(operation) {
            return Err(PersistenceError::Storage(format!("{operation} rejected")));
        }
        self.calls
            .lock()
            .expect("Lock poisoned")
            .push(format!("{operation} {detail}"));
        Ok(())
    }
}

#[async_trait]
impl PersistenceCollaborator for MockPersistence {
    async fn persist_move(
        &self,
        old_path: &str,
        new_parent_dir: &str,
        _kind: ItemKind,
    ) -> Result<(), PersistenceError> {
        self.record("move", format!("{old_path} -> {new_parent_dir}"))
            .await
    }

    async fn persist_resequence(&self, items: &[SeqAssignment]) -> Result<(), PersistenceError> {
        let detail = items
            .iter()
            .map(|item| format!("{}={}", item.pathname, item.seq))
            .collect::<Vec<_>>()
            .join(",");
        self.record("resequence", detail).await
    }

    async fn persist_rename(
        &self,
        uid: &str,
        old_path: &str,
        new_path: &str,
        new_name: Option<&str>,
        _new_filename: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let name = new_name.unwrap_or("-");
        self.record("rename", format!("{uid} {old_path} -> {new_path} ({name})"))
            .await
    }

    async fn persist_create(&self, path: &str, _item: &Item) -> Result<(), PersistenceError> {
        self.record("create", path.to_string()).await
    }

    async fn persist_delete(&self, path: &str, kind: ItemKind) -> Result<(), PersistenceError> {
        self.record("delete", format!("{kind} {path}")).await
    }

    async fn persist_clone_folder(
        &self,
        _folder: &Folder,
        dest_path: &str,
    ) -> Result<(), PersistenceError> {
        self.record("clone-folder", dest_path.to_string()).await
    }

    async fn load_collection(&self, root: &str) -> Result<Collection, PersistenceError> {
        self.stored
            .lock()
            .expect("Lock poisoned")
            .clone()
            .ok_or_else(|| PersistenceError::NotFound(root.to_string()))
    }
}
