//! Item removal.

use super::{MutationResult, PersistenceOp, detach};
use crate::collection::{Collection, find_item};
use crate::error::{TreeError, TreeResult};

/// Removes an item and, for folders, its whole subtree.
///
/// Remaining siblings keep their `seq`; a gap left behind is closed by the next
/// mutation that touches the container or by an explicit resequence.
///
/// # Errors
/// `NotFound` if the uid does not resolve.
pub fn delete_item(tree: &Collection, uid: &str) -> TreeResult<MutationResult> {
    let item = find_item(tree, uid).ok_or_else(|| TreeError::NotFound(uid.to_string()))?;
    let op = PersistenceOp::Delete {
        uid: uid.to_string(),
        path: item.pathname().to_string(),
        kind: item.kind(),
    };

    let mut next = tree.clone();
    detach(&mut next, uid)?;
    Ok(MutationResult::applied(next, vec![op]))
}
