//! New requests and folders.

use super::clone::display_name;
use super::resequence::append_request;
use super::{
    MutationResult, PersistenceOp, container, container_mut, ensure_unique_filename,
    push_resequence,
};
use crate::collection::{
    Collection, Folder, ItemKind, Request, folder_dirname, request_filename,
};
use crate::error::{TreeError, TreeResult};

/// Creates a request at the end of a container's request order.
///
/// `parent_uid` of `None` creates the request at the collection root.
///
/// # Errors
/// `NotFound`/`NotAContainer` for a bad parent, `InvalidName` for unusable
/// names, `DuplicateName` if a sibling request already uses the filename.
pub fn create_request(
    tree: &Collection,
    parent_uid: Option<&str>,
    name: &str,
    filename: &str,
    payload: serde_json::Value,
) -> TreeResult<MutationResult> {
    let name = display_name(name)?;
    let filename = request_filename(filename)?;
    let (parent_path, siblings) = container(tree, parent_uid)?;
    ensure_unique_filename(siblings, parent_path, ItemKind::Request, &filename, None)?;

    let request = Request::new(name, filename, parent_path, 0).with_payload(payload);
    let mut next = tree.clone();
    let items = container_mut(&mut next, parent_uid)?;
    let compaction = append_request(items, request);
    let created = items
        .last()
        .cloned()
        .ok_or_else(|| TreeError::NotFound(parent_uid.unwrap_or_default().to_string()))?;

    let mut ops = vec![PersistenceOp::Create {
        path: created.pathname().to_string(),
        item: created,
    }];
    push_resequence(&mut ops, compaction);
    Ok(MutationResult::applied(next, ops))
}

/// Creates an empty folder.
///
/// # Errors
/// `NotFound`/`NotAContainer` for a bad parent, `InvalidName` for unusable
/// names, `DuplicateName` if a sibling folder already uses the directory name.
pub fn create_folder(
    tree: &Collection,
    parent_uid: Option<&str>,
    name: &str,
    dirname: &str,
) -> TreeResult<MutationResult> {
    let name = display_name(name)?;
    let dirname = folder_dirname(dirname)?;
    let (parent_path, siblings) = container(tree, parent_uid)?;
    ensure_unique_filename(siblings, parent_path, ItemKind::Folder, &dirname, None)?;

    let folder = Folder::new(name, dirname, parent_path);
    let op = PersistenceOp::Create {
        path: folder.pathname.clone(),
        item: folder.clone().into(),
    };

    let mut next = tree.clone();
    container_mut(&mut next, parent_uid)?.push(folder.into());
    Ok(MutationResult::applied(next, vec![op]))
}
