//! Sibling ordering for requests.

use super::{MutationResult, PersistenceOp, SeqAssignment, container, container_mut};
use crate::collection::{Collection, Item, Request, Uid};
use crate::error::TreeResult;

/// Request children of a container in display order.
///
/// Sorted by ascending `seq`; equal values keep their relative position in
/// `items`. Folders are not part of the ordering.
#[must_use]
pub fn display_order(items: &[Item]) -> Vec<&Request> {
    let mut requests: Vec<&Request> = items
        .iter()
        .filter_map(|item| match item {
            Item::Request(request) => Some(request),
            Item::Folder(_) => None,
        })
        .collect();
    requests.sort_by_key(|request| request.seq);
    requests
}

/// Assignments that would renumber a sibling set to `1..=n` in display order.
///
/// Only requests whose `seq` actually changes are returned, so running this on
/// a set that is already contiguous yields nothing.
#[must_use]
pub fn items_to_resequence(items: &[Item]) -> Vec<SeqAssignment> {
    display_order(items)
        .into_iter()
        .zip(1..)
        .filter(|(request, seq)| request.seq != *seq)
        .map(|(request, seq)| SeqAssignment {
            uid: request.uid.clone(),
            seq,
            pathname: request.pathname.clone(),
        })
        .collect()
}

/// Compacts the request `seq` values of one container to `1..=n`.
///
/// `container_uid` of `None` addresses the collection root.
///
/// # Errors
/// Returns `NotFound` for an unknown container and `NotAContainer` for a
/// request uid.
pub fn resequence(tree: &Collection, container_uid: Option<&str>) -> TreeResult<MutationResult> {
    let (_, items) = container(tree, container_uid)?;
    if items_to_resequence(items).is_empty() {
        return Ok(MutationResult::unchanged(tree));
    }

    let mut next = tree.clone();
    let changes = compact(container_mut(&mut next, container_uid)?);
    Ok(MutationResult::applied(
        next,
        vec![PersistenceOp::Resequence(changes)],
    ))
}

/// Uids of the request children in display order.
pub(crate) fn display_uids(items: &[Item]) -> Vec<Uid> {
    display_order(items)
        .into_iter()
        .map(|request| request.uid.clone())
        .collect()
}

/// Gives the requests listed in `order` the `seq` values `1..=n` in that order.
///
/// Returns the assignments whose value changed, ordered by new `seq`.
pub(crate) fn assign_order(items: &mut [Item], order: &[Uid]) -> Vec<SeqAssignment> {
    let mut changes = Vec::new();
    for (uid, seq) in order.iter().zip(1..) {
        let request = items.iter_mut().find_map(|item| match item {
            Item::Request(request) if request.uid == *uid => Some(request),
            _ => None,
        });
        if let Some(request) = request
            && request.seq != seq
        {
            request.seq = seq;
            changes.push(SeqAssignment {
                uid: request.uid.clone(),
                seq,
                pathname: request.pathname.clone(),
            });
        }
    }
    changes
}

/// Renumbers a sibling set to `1..=n` keeping its display order.
pub(crate) fn compact(items: &mut [Item]) -> Vec<SeqAssignment> {
    let order = display_uids(items);
    assign_order(items, &order)
}

/// Compacts the existing requests, then appends `request` at the end.
///
/// Returns the assignments for the existing siblings; the new request carries
/// its own `seq`.
pub(crate) fn append_request(items: &mut Vec<Item>, mut request: Request) -> Vec<SeqAssignment> {
    let changes = compact(items);
    let count = items.iter().filter(|item| item.is_request()).count();
    request.seq = u32::try_from(count + 1).unwrap_or(u32::MAX);
    items.push(Item::Request(request));
    changes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::collection::Folder;
    use crate::mutation::Outcome;
    use crate::mutation::fixtures::{order_of, sample, seq_of, uid};
    use pretty_assertions::assert_eq;

    fn requests(seqs: &[(&str, u32)]) -> Vec<Item> {
        seqs.iter()
            .map(|(name, seq)| Request::new(*name, format!("{name}.json"), "/api", *seq).into())
            .collect()
    }

    #[test]
    fn test_display_order_sorts_by_seq() {
        let items = requests(&[("c", 3), ("a", 1), ("b", 2)]);
        assert_eq!(order_of(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_display_order_ties_keep_position() {
        let items = requests(&[("x", 2), ("y", 1), ("z", 2)]);
        assert_eq!(order_of(&items), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_display_order_skips_folders() {
        let mut items = requests(&[("a", 1)]);
        items.insert(0, Folder::new("F", "f", "/api").into());
        assert_eq!(order_of(&items), vec!["a"]);
    }

    #[test]
    fn test_items_to_resequence_closes_gaps() {
        let items = requests(&[("a", 1), ("c", 3), ("d", 7)]);
        let changes = items_to_resequence(&items);
        let seqs: Vec<(String, u32)> = changes
            .iter()
            .map(|change| (change.pathname.clone(), change.seq))
            .collect();
        assert_eq!(
            seqs,
            vec![
                ("/api/c.json".to_string(), 2),
                ("/api/d.json".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_items_to_resequence_is_idempotent() {
        let mut items = requests(&[("a", 4), ("b", 9), ("c", 2)]);
        let first = compact(&mut items);
        assert_eq!(first.len(), 3);
        assert!(items_to_resequence(&items).is_empty());
        assert!(compact(&mut items).is_empty());
        assert_eq!(order_of(&items), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_append_request_compacts_first() {
        let mut items = requests(&[("a", 1), ("c", 3)]);
        let changes = append_request(&mut items, Request::new("d", "d.json", "/api", 0));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].seq, 2);
        assert_eq!(items.last().and_then(Item::seq), Some(3));
    }

    #[test]
    fn test_resequence_root() {
        let mut tree = sample();
        if let Item::Request(request) = &mut tree.items[1] {
            request.seq = 5;
        }
        if let Item::Request(request) = &mut tree.items[2] {
            request.seq = 9;
        }

        let result = resequence(&tree, None).expect("root resequence should succeed");
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(seq_of(&result.tree, "B"), Some(2));
        assert_eq!(seq_of(&result.tree, "C"), Some(3));
        assert_eq!(result.ops.len(), 1);

        let again = resequence(&result.tree, None).expect("second pass should succeed");
        assert!(again.is_unchanged());
    }

    #[test]
    fn test_resequence_rejects_request_container() {
        let tree = sample();
        let a = uid(&tree, "A");
        assert!(resequence(&tree, Some(&a)).is_err());
        assert!(resequence(&tree, Some("missing")).is_err());
    }
}
