//! Domain error types

use thiserror::Error;

/// Structural errors raised by tree mutations.
///
/// They are detected before any new tree is computed, so an operation that
/// fails with one of these leaves nothing to persist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced uid does not resolve, typically a stale UI reference.
    #[error("item not found: {0}")]
    NotFound(String),

    /// A sibling of the same type already uses this filename.
    #[error("an item named '{filename}' already exists in {parent}")]
    DuplicateName {
        /// The colliding filename.
        filename: String,
        /// Path of the container where the collision occurred.
        parent: String,
    },

    /// A folder was dropped onto itself or into its own subtree.
    #[error("cannot move {dragged} into {target}")]
    InvalidMove {
        /// Uid of the dragged item.
        dragged: String,
        /// Uid of the drop target.
        target: String,
    },

    /// A filename is blank, contains a separator or is reserved.
    #[error("invalid file name: '{0}'")]
    InvalidName(String),

    /// A request was addressed where a folder or the root was expected.
    #[error("item is not a folder: {0}")]
    NotAContainer(String),
}

/// Result type alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
