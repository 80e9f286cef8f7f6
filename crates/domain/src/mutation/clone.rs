//! Duplication of requests and folder subtrees.

use super::resequence::append_request;
use super::{
    MutationResult, PersistenceOp, container, container_mut, ensure_unique_filename, parent_key,
    push_resequence,
};
use crate::collection::{
    Collection, Item, ItemKind, Request, find_item, folder_dirname, request_filename,
};
use crate::error::{TreeError, TreeResult};
use crate::id::generate_id;
use crate::path;

/// Duplicates an item next to the original.
///
/// A cloned request is appended after its request siblings and keeps the
/// source payload. A cloned folder copies the whole subtree; every node gets a
/// fresh uid and the descendants keep their names, filenames and `seq`.
///
/// # Errors
/// `NotFound` if the uid does not resolve, `InvalidName` for an unusable
/// filename, `DuplicateName` if a sibling of the same kind already uses it.
pub fn clone_item(
    tree: &Collection,
    source_uid: &str,
    new_name: &str,
    new_filename: &str,
) -> TreeResult<MutationResult> {
    let source =
        find_item(tree, source_uid).ok_or_else(|| TreeError::NotFound(source_uid.to_string()))?;
    let name = display_name(new_name)?;
    let parent = parent_key(tree, source_uid)?;
    let (parent_path, siblings) = container(tree, parent.as_deref())?;

    let filename = match source.kind() {
        ItemKind::Folder => folder_dirname(new_filename)?,
        ItemKind::Request => request_filename(new_filename)?,
    };
    ensure_unique_filename(siblings, parent_path, source.kind(), &filename, None)?;
    let parent_path = parent_path.to_string();

    let mut next = tree.clone();
    let items = container_mut(&mut next, parent.as_deref())?;

    match source {
        Item::Folder(original) => {
            let mut folder = original.with_fresh_uids();
            folder.name = name;
            folder.filename = filename;
            folder.repath(&parent_path);

            let op = PersistenceOp::CloneFolder {
                dest_path: folder.pathname.clone(),
                folder: folder.clone(),
            };
            items.push(folder.into());
            Ok(MutationResult::applied(next, vec![op]))
        }
        Item::Request(original) => {
            let copy = Request {
                uid: generate_id(),
                name,
                pathname: path::join(&[parent_path.as_str(), filename.as_str()]),
                filename,
                seq: 0,
                payload: original.payload.clone(),
            };
            let compaction = append_request(items, copy);
            let created = items
                .last()
                .cloned()
                .ok_or_else(|| TreeError::NotFound(source_uid.to_string()))?;

            let mut ops = vec![PersistenceOp::Create {
                path: created.pathname().to_string(),
                item: created,
            }];
            push_resequence(&mut ops, compaction);
            Ok(MutationResult::applied(next, ops))
        }
    }
}

/// Trims a display name, rejecting blank ones.
pub(crate) fn display_name(name: &str) -> TreeResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
