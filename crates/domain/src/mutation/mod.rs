//! Tree mutation engine.
//!
//! Every operation is a pure function from a tree snapshot to a
//! [`MutationResult`]: the tree as it should look afterwards plus the ordered
//! list of [`PersistenceOp`]s that bring the file system in line with it. The
//! input tree is never modified.
//!
//! Structural problems (`NotFound`, `DuplicateName`, ...) are detected before
//! anything is computed and abort the whole operation.

mod clone;
mod create;
mod delete;
mod move_item;
mod rename;
mod resequence;

use serde::{Deserialize, Serialize};

use crate::collection::access::container_items_mut;
use crate::collection::{Collection, Folder, Item, ItemKind, Uid, find_item, find_parent};
use crate::error::{TreeError, TreeResult};

pub use clone::clone_item;
pub use create::{create_folder, create_request};
pub use delete::delete_item;
pub use move_item::{move_item, move_item_to_root};
pub use rename::rename_item;
pub use resequence::{display_order, items_to_resequence, resequence};

/// A `seq` value to write for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqAssignment {
    /// Uid of the request.
    pub uid: Uid,
    /// New 1-based position.
    pub seq: u32,
    /// Path of the request file after the mutation.
    pub pathname: String,
}

/// A command for the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PersistenceOp {
    /// Move a file or directory into another directory, keeping its name.
    Move {
        /// Uid of the moved item.
        uid: Uid,
        /// Path before the move.
        old_path: String,
        /// Directory receiving the item.
        new_parent_dir: String,
        /// Whether a file or a directory moves.
        kind: ItemKind,
    },
    /// Rewrite `seq` for a set of sibling requests.
    Resequence(Vec<SeqAssignment>),
    /// Rename an item on disk and/or its display name.
    Rename {
        /// Uid of the renamed item.
        uid: Uid,
        /// Path before the rename.
        old_path: String,
        /// Path after the rename; equal to `old_path` for display-name changes.
        new_path: String,
        /// New display name, if it changed.
        new_name: Option<String>,
        /// New file name, if it changed.
        new_filename: Option<String>,
    },
    /// Create a new request or an empty folder.
    Create {
        /// Path of the new item.
        path: String,
        /// The item to write.
        item: Item,
    },
    /// Delete a file, or a directory with everything below it.
    Delete {
        /// Uid of the deleted item.
        uid: Uid,
        /// Path of the deleted item.
        path: String,
        /// Whether a file or a directory goes.
        kind: ItemKind,
    },
    /// Write a cloned folder subtree to a new directory.
    CloneFolder {
        /// The clone, already carrying fresh uids and final pathnames.
        folder: Folder,
        /// Directory to create.
        dest_path: String,
    },
}

impl PersistenceOp {
    /// Short operation name for logs and error reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Resequence(_) => "resequence",
            Self::Rename { .. } => "rename",
            Self::Create { .. } => "create",
            Self::Delete { .. } => "delete",
            Self::CloneFolder { .. } => "clone-folder",
        }
    }

    /// Uids of the items this command touches.
    #[must_use]
    pub fn uids(&self) -> Vec<Uid> {
        match self {
            Self::Move { uid, .. } | Self::Rename { uid, .. } | Self::Delete { uid, .. } => {
                vec![uid.clone()]
            }
            Self::Resequence(assignments) => assignments.iter().map(|a| a.uid.clone()).collect(),
            Self::Create { item, .. } => vec![item.uid().to_string()],
            Self::CloneFolder { folder, .. } => vec![folder.uid.clone()],
        }
    }
}

/// Whether an operation changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The tree changed and `ops` must be persisted.
    Applied,
    /// Nothing to do; the tree is returned as it was.
    Unchanged,
}

/// The result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    /// The tree after the mutation.
    pub tree: Collection,
    /// Commands to persist, in the order they must run.
    pub ops: Vec<PersistenceOp>,
    /// Whether anything changed.
    pub outcome: Outcome,
}

impl MutationResult {
    pub(crate) fn unchanged(tree: &Collection) -> Self {
        Self {
            tree: tree.clone(),
            ops: Vec::new(),
            outcome: Outcome::Unchanged,
        }
    }

    pub(crate) fn applied(tree: Collection, ops: Vec<PersistenceOp>) -> Self {
        Self {
            tree,
            ops,
            outcome: Outcome::Applied,
        }
    }

    /// Returns true if the mutation was a no-op.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.outcome == Outcome::Unchanged
    }

    /// Uids touched by any of the persistence commands, without duplicates.
    #[must_use]
    pub fn affected_uids(&self) -> Vec<Uid> {
        let mut uids: Vec<Uid> = Vec::new();
        for uid in self.ops.iter().flat_map(PersistenceOp::uids) {
            if !uids.contains(&uid) {
                uids.push(uid);
            }
        }
        uids
    }
}

/// Pushes a resequence command unless it would be empty.
pub(crate) fn push_resequence(ops: &mut Vec<PersistenceOp>, assignments: Vec<SeqAssignment>) {
    if !assignments.is_empty() {
        ops.push(PersistenceOp::Resequence(assignments));
    }
}

/// Container key of an item: `None` for the root, the folder uid otherwise.
///
/// # Errors
/// Returns `TreeError::NotFound` if the uid does not resolve.
pub(crate) fn parent_key(tree: &Collection, uid: &str) -> TreeResult<Option<Uid>> {
    find_parent(tree, uid)
        .map(|parent| parent.folder_uid().map(ToString::to_string))
        .ok_or_else(|| TreeError::NotFound(uid.to_string()))
}

/// Looks up a container by key.
///
/// # Errors
/// Returns `NotFound` for a missing uid and `NotAContainer` for a request.
pub(crate) fn container<'a>(
    tree: &'a Collection,
    key: Option<&str>,
) -> TreeResult<(&'a str, &'a [Item])> {
    match key {
        None => Ok((&tree.pathname, &tree.items)),
        Some(uid) => match find_item(tree, uid) {
            Some(Item::Folder(folder)) => Ok((&folder.pathname, &folder.items)),
            Some(Item::Request(_)) => Err(TreeError::NotAContainer(uid.to_string())),
            None => Err(TreeError::NotFound(uid.to_string())),
        },
    }
}

/// Mutable counterpart of [`container`] for a tree already validated.
pub(crate) fn container_mut<'a>(
    tree: &'a mut Collection,
    key: Option<&str>,
) -> TreeResult<&'a mut Vec<Item>> {
    container_items_mut(tree, key)
        .ok_or_else(|| TreeError::NotFound(key.unwrap_or_default().to_string()))
}

/// Rejects `filename` if a sibling of the same kind already uses it.
///
/// Comparison is case-sensitive on trimmed names; folders and requests never
/// collide with each other.
pub(crate) fn ensure_unique_filename(
    siblings: &[Item],
    parent_path: &str,
    kind: ItemKind,
    filename: &str,
    except_uid: Option<&str>,
) -> TreeResult<()> {
    let wanted = filename.trim();
    let taken = siblings.iter().any(|item| {
        item.kind() == kind
            && Some(item.uid()) != except_uid
            && item.filename().trim() == wanted
    });

    if taken {
        return Err(TreeError::DuplicateName {
            filename: wanted.to_string(),
            parent: parent_path.to_string(),
        });
    }
    Ok(())
}

/// Removes an item from whichever container holds it.
pub(crate) fn detach(tree: &mut Collection, uid: &str) -> TreeResult<Item> {
    let key = parent_key(tree, uid)?;
    let items = container_mut(tree, key.as_deref())?;
    let index = items
        .iter()
        .position(|item| item.uid() == uid)
        .ok_or_else(|| TreeError::NotFound(uid.to_string()))?;
    Ok(items.remove(index))
}
