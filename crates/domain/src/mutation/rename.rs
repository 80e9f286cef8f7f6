//! Display-name and file-name changes.

use super::clone::display_name;
use super::{MutationResult, PersistenceOp, container, ensure_unique_filename, parent_key};
use crate::collection::access::find_item_mut;
use crate::collection::{Collection, ItemKind, find_item, folder_dirname, request_filename};
use crate::error::{TreeError, TreeResult};
use crate::path;

/// Changes the display name, the on-disk name, or both.
///
/// Renaming a folder on disk recomputes the pathname of every descendant;
/// uids and `seq` values are preserved. Passing values equal to the current
/// ones (or none at all) is a no-op.
///
/// # Errors
/// `NotFound` if the uid does not resolve, `InvalidName` for a blank name or
/// unusable filename, `DuplicateName` if a sibling of the same kind already
/// uses the new filename.
pub fn rename_item(
    tree: &Collection,
    uid: &str,
    new_name: Option<&str>,
    new_filename: Option<&str>,
) -> TreeResult<MutationResult> {
    let item = find_item(tree, uid).ok_or_else(|| TreeError::NotFound(uid.to_string()))?;

    let name = new_name
        .map(display_name)
        .transpose()?
        .filter(|name| name != item.name());
    let filename = new_filename
        .map(|filename| match item.kind() {
            ItemKind::Folder => folder_dirname(filename),
            ItemKind::Request => request_filename(filename),
        })
        .transpose()?
        .filter(|filename| filename != item.filename());

    if name.is_none() && filename.is_none() {
        return Ok(MutationResult::unchanged(tree));
    }

    let parent = parent_key(tree, uid)?;
    let (parent_path, siblings) = container(tree, parent.as_deref())?;
    if let Some(filename) = &filename {
        ensure_unique_filename(siblings, parent_path, item.kind(), filename, Some(uid))?;
    }
    let parent_path = parent_path.to_string();
    let old_path = item.pathname().to_string();

    let mut next = tree.clone();
    let target =
        find_item_mut(&mut next.items, uid).ok_or_else(|| TreeError::NotFound(uid.to_string()))?;
    if let Some(name) = &name {
        target.set_name(name.clone());
    }
    if let Some(filename) = &filename {
        target.set_filename(filename.clone());
        target.repath(&parent_path);
    }

    let new_path = filename.as_ref().map_or_else(
        || old_path.clone(),
        |filename| path::join(&[parent_path.as_str(), filename.as_str()]),
    );
    let op = PersistenceOp::Rename {
        uid: uid.to_string(),
        old_path,
        new_path,
        new_name: name,
        new_filename: filename,
    };
    Ok(MutationResult::applied(next, vec![op]))
}
