//! Structural checks over a collection tree.
//!
//! Mutations keep these invariants on their own; the checks exist for loaders
//! that ingest trees from elsewhere and for tests.

use std::collections::HashSet;

use super::item::{Collection, Item, Uid};
use crate::path;

/// A container whose request `seq` values are not exactly `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceGap {
    /// Path of the container (folder or collection root).
    pub container: String,
    /// The `seq` values found, in display order.
    pub found: Vec<u32>,
}

/// Uids that appear more than once in the tree.
#[must_use]
pub fn duplicate_uids(tree: &Collection) -> Vec<Uid> {
    fn walk(items: &[Item], seen: &mut HashSet<Uid>, duplicates: &mut Vec<Uid>) {
        for item in items {
            if !seen.insert(item.uid().to_string()) {
                duplicates.push(item.uid().to_string());
            }
            walk(item.children(), seen, duplicates);
        }
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    seen.insert(tree.uid.clone());
    walk(&tree.items, &mut seen, &mut duplicates);
    duplicates
}

/// Containers whose request children do not carry a contiguous `1..=n`.
#[must_use]
pub fn sequence_gaps(tree: &Collection) -> Vec<SequenceGap> {
    fn check(container: &str, items: &[Item], gaps: &mut Vec<SequenceGap>) {
        let mut found: Vec<u32> = items.iter().filter_map(Item::seq).collect();
        found.sort_unstable();
        let contiguous = found
            .iter()
            .enumerate()
            .all(|(index, seq)| usize::try_from(*seq).is_ok_and(|seq| seq == index + 1));
        if !contiguous {
            gaps.push(SequenceGap {
                container: container.to_string(),
                found,
            });
        }
        for item in items {
            if let Item::Folder(folder) = item {
                check(&folder.pathname, &folder.items, gaps);
            }
        }
    }

    let mut gaps = Vec::new();
    check(&tree.pathname, &tree.items, &mut gaps);
    gaps
}

/// Items whose `pathname` is not `join(parent.pathname, filename)`.
#[must_use]
pub fn misplaced_paths(tree: &Collection) -> Vec<Uid> {
    fn walk(parent_path: &str, items: &[Item], misplaced: &mut Vec<Uid>) {
        for item in items {
            let expected = path::join(&[parent_path, item.filename()]);
            if item.pathname() != expected {
                misplaced.push(item.uid().to_string());
            }
            walk(item.pathname(), item.children(), misplaced);
        }
    }

    let mut misplaced = Vec::new();
    walk(&tree.pathname, &tree.items, &mut misplaced);
    misplaced
}
