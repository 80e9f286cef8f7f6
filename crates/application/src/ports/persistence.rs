//! Persistence collaborator port.
//!
//! The core never touches storage itself. Every structural change is expressed
//! as a list of commands that an implementation of this trait carries out.

use arbor_domain::{Collection, Folder, Item, ItemKind, SeqAssignment};
use async_trait::async_trait;

use super::FileSystemError;

/// Error type for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The path to act on does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The destination is already taken.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Stored data could not be read back into a tree.
    #[error("invalid collection data: {0}")]
    InvalidData(String),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<FileSystemError> for PersistenceError {
    fn from(error: FileSystemError) -> Self {
        match error {
            FileSystemError::NotFound(path) => Self::NotFound(path.display().to_string()),
            FileSystemError::AlreadyExists(path) => {
                Self::AlreadyExists(path.display().to_string())
            }
            other => Self::Storage(other.to_string()),
        }
    }
}

/// The external store a collection tree is mirrored to.
///
/// Calls may fail and are not assumed to be idempotent; callers never retry.
#[async_trait]
pub trait PersistenceCollaborator: Send + Sync {
    /// Moves a request file or folder directory into `new_parent_dir`.
    async fn persist_move(
        &self,
        old_path: &str,
        new_parent_dir: &str,
        kind: ItemKind,
    ) -> Result<(), PersistenceError>;

    /// Writes new `seq` values.
    async fn persist_resequence(&self, items: &[SeqAssignment]) -> Result<(), PersistenceError>;

    /// Renames an item on disk and/or changes its display name.
    ///
    /// `uid` is the item's identity in the tree. Metadata written for the
    /// item must keep it.
    async fn persist_rename(
        &self,
        uid: &str,
        old_path: &str,
        new_path: &str,
        new_name: Option<&str>,
        new_filename: Option<&str>,
    ) -> Result<(), PersistenceError>;

    /// Creates a request file or an empty folder.
    async fn persist_create(&self, path: &str, item: &Item) -> Result<(), PersistenceError>;

    /// Deletes a request file or a folder with its contents.
    async fn persist_delete(&self, path: &str, kind: ItemKind) -> Result<(), PersistenceError>;

    /// Writes a cloned folder subtree at `dest_path`.
    async fn persist_clone_folder(
        &self,
        folder: &Folder,
        dest_path: &str,
    ) -> Result<(), PersistenceError>;

    /// Reads the authoritative tree rooted at `root`.
    async fn load_collection(&self, root: &str) -> Result<Collection, PersistenceError>;
}
