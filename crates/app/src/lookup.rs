//! Resolving item references given on the command line.

use anyhow::Context;
use arbor_domain::collection::{find_item, find_item_by_pathname};
use arbor_domain::{Collection, Uid, path};

/// Finds an item by uid, falling back to a path relative to the collection root.
pub fn resolve_item(tree: &Collection, reference: &str) -> anyhow::Result<Uid> {
    if let Some(item) = find_item(tree, reference) {
        return Ok(item.uid().to_string());
    }

    let pathname = path::join(&[tree.pathname.as_str(), reference.trim()]);
    find_item_by_pathname(tree, &pathname)
        .map(|item| item.uid().to_string())
        .with_context(|| format!("no item matches `{reference}`"))
}

/// [`resolve_item`] for an optional container; `None` is the collection root.
pub fn resolve_parent(tree: &Collection, reference: Option<&str>) -> anyhow::Result<Option<Uid>> {
    reference.map(|r| resolve_item(tree, r)).transpose()
}
