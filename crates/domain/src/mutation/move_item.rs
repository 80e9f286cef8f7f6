//! Drag-and-drop relocation.

use super::resequence::{assign_order, compact, display_uids};
use super::{
    MutationResult, PersistenceOp, container, container_mut, detach, ensure_unique_filename,
    parent_key, push_resequence,
};
use crate::collection::{Collection, ItemKind, find_item, is_ancestor};
use crate::error::{TreeError, TreeResult};

/// Where a relocated request lands in its new sibling order.
#[derive(Debug, Clone, Copy)]
enum Placement<'a> {
    Before(&'a str),
    End,
}

/// Moves `dragged_uid` in response to a drop on `target_uid`.
///
/// | dragged | target  | situation                           | result                               |
/// |---------|---------|-------------------------------------|--------------------------------------|
/// | any     | itself  |                                     | unchanged                            |
/// | request | request | same container                      | reorder before the target            |
/// | request | request | other container                     | move next to the target, before it   |
/// | request | folder  | already inside the folder           | unchanged                            |
/// | request | folder  | elsewhere                           | append to the folder                 |
/// | folder  | folder  | already inside the folder           | unchanged                            |
/// | folder  | any     | target inside the dragged subtree   | `InvalidMove`                        |
/// | folder  | folder  | elsewhere                           | move into the folder                 |
/// | folder  | request | target at the root, folder is not   | move to the root                     |
/// | folder  | request | otherwise                           | unchanged                            |
///
/// # Errors
/// `NotFound` if either uid does not resolve, `DuplicateName` if the
/// destination already has a sibling of the same kind with the same filename,
/// `InvalidMove` if a folder would end up inside itself.
pub fn move_item(
    tree: &Collection,
    dragged_uid: &str,
    target_uid: &str,
) -> TreeResult<MutationResult> {
    let dragged = find_item(tree, dragged_uid)
        .ok_or_else(|| TreeError::NotFound(dragged_uid.to_string()))?;
    let target =
        find_item(tree, target_uid).ok_or_else(|| TreeError::NotFound(target_uid.to_string()))?;

    if dragged_uid == target_uid {
        return Ok(MutationResult::unchanged(tree));
    }

    let dragged_parent = parent_key(tree, dragged_uid)?;
    let target_parent = parent_key(tree, target_uid)?;
    let same_parent = dragged_parent == target_parent;
    let already_inside_target = dragged_parent.as_deref() == Some(target_uid);
    let into_own_subtree = is_ancestor(tree, dragged_uid, target_uid);

    match (dragged.kind(), target.kind()) {
        (ItemKind::Request, ItemKind::Request) if same_parent => {
            reorder(tree, dragged_parent.as_deref(), dragged_uid, target_uid)
        }
        (ItemKind::Request, ItemKind::Request) => relocate(
            tree,
            dragged_uid,
            target_parent.as_deref(),
            Placement::Before(target_uid),
        ),
        (ItemKind::Request | ItemKind::Folder, ItemKind::Folder) if already_inside_target => {
            Ok(MutationResult::unchanged(tree))
        }
        (ItemKind::Request, ItemKind::Folder) => {
            relocate(tree, dragged_uid, Some(target_uid), Placement::End)
        }
        (ItemKind::Folder, _) if into_own_subtree => Err(TreeError::InvalidMove {
            dragged: dragged_uid.to_string(),
            target: target_uid.to_string(),
        }),
        (ItemKind::Folder, ItemKind::Folder) => {
            relocate(tree, dragged_uid, Some(target_uid), Placement::End)
        }
        (ItemKind::Folder, ItemKind::Request) if target_parent.is_none() && !same_parent => {
            relocate(tree, dragged_uid, None, Placement::End)
        }
        (ItemKind::Folder, ItemKind::Request) => Ok(MutationResult::unchanged(tree)),
    }
}

/// Moves an item to the top level of the collection.
///
/// Requests are appended after the existing top-level requests.
///
/// # Errors
/// `NotFound` if the uid does not resolve, `DuplicateName` if the root already
/// has a sibling of the same kind with the same filename.
pub fn move_item_to_root(tree: &Collection, dragged_uid: &str) -> TreeResult<MutationResult> {
    if parent_key(tree, dragged_uid)?.is_none() {
        return Ok(MutationResult::unchanged(tree));
    }
    relocate(tree, dragged_uid, None, Placement::End)
}

/// Reorders a request within its own container.
fn reorder(
    tree: &Collection,
    container_key: Option<&str>,
    dragged_uid: &str,
    target_uid: &str,
) -> TreeResult<MutationResult> {
    let mut next = tree.clone();
    let items = container_mut(&mut next, container_key)?;

    let mut order = display_uids(items);
    order.retain(|uid| uid != dragged_uid);
    let index = order
        .iter()
        .position(|uid| uid == target_uid)
        .unwrap_or(order.len());
    order.insert(index, dragged_uid.to_string());

    let changes = assign_order(items, &order);
    if changes.is_empty() {
        return Ok(MutationResult::unchanged(tree));
    }
    Ok(MutationResult::applied(
        next,
        vec![PersistenceOp::Resequence(changes)],
    ))
}

/// Moves an item into another container.
///
/// Emits the file move first, then the resequencing of the container that lost
/// the item, then the one that gained it.
fn relocate(
    tree: &Collection,
    dragged_uid: &str,
    destination: Option<&str>,
    placement: Placement<'_>,
) -> TreeResult<MutationResult> {
    let source = parent_key(tree, dragged_uid)?;
    let dragged = find_item(tree, dragged_uid)
        .ok_or_else(|| TreeError::NotFound(dragged_uid.to_string()))?;
    let kind = dragged.kind();

    let (dest_path, dest_items) = container(tree, destination)?;
    ensure_unique_filename(dest_items, dest_path, kind, dragged.filename(), None)?;
    let dest_path = dest_path.to_string();

    let mut next = tree.clone();
    let mut item = detach(&mut next, dragged_uid)?;
    let old_path = item.pathname().to_string();
    item.repath(&dest_path);

    let mut ops = vec![PersistenceOp::Move {
        uid: dragged_uid.to_string(),
        old_path,
        new_parent_dir: dest_path,
        kind,
    }];

    let items = container_mut(&mut next, destination)?;
    if kind == ItemKind::Folder {
        items.push(item);
        return Ok(MutationResult::applied(next, ops));
    }

    let mut order = display_uids(items);
    let index = match placement {
        Placement::Before(target_uid) => order
            .iter()
            .position(|uid| uid == target_uid)
            .unwrap_or(order.len()),
        Placement::End => order.len(),
    };
    order.insert(index, dragged_uid.to_string());
    items.push(item);
    let incoming = assign_order(items, &order);

    let outgoing = compact(container_mut(&mut next, source.as_deref())?);
    push_resequence(&mut ops, outgoing);
    push_resequence(&mut ops, incoming);

    Ok(MutationResult::applied(next, ops))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::collection::invariants::{duplicate_uids, misplaced_paths, sequence_gaps};
    use crate::collection::{Folder, Item, Request, find_folder, find_parent};
    use crate::mutation::fixtures::{order_of, sample, seq_of, uid};
    use crate::mutation::{Outcome, SeqAssignment};
    use pretty_assertions::assert_eq;

    fn assert_clean(tree: &Collection) {
        assert!(duplicate_uids(tree).is_empty());
        assert!(sequence_gaps(tree).is_empty(), "{:?}", sequence_gaps(tree));
        assert!(misplaced_paths(tree).is_empty());
    }

    fn folder_items<'a>(tree: &'a Collection, name: &str) -> &'a [Item] {
        find_folder(tree, &uid(tree, name)).map_or(&[], |folder| folder.items.as_slice())
    }

    #[test]
    fn test_reorder_moves_before_target() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "C"), &uid(&tree, "A"))
            .expect("reorder should succeed");

        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(seq_of(&result.tree, "C"), Some(1));
        assert_eq!(seq_of(&result.tree, "A"), Some(2));
        assert_eq!(seq_of(&result.tree, "B"), Some(3));
        assert_eq!(order_of(&result.tree.items), vec!["C", "A", "B"]);
        assert_eq!(result.ops.len(), 1);
        assert!(matches!(&result.ops[0], PersistenceOp::Resequence(changes) if changes.len() == 3));
        assert_clean(&result.tree);
    }

    #[test]
    fn test_reorder_downwards() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "A"), &uid(&tree, "C"))
            .expect("reorder should succeed");
        assert_eq!(order_of(&result.tree.items), vec!["B", "A", "C"]);
        assert_clean(&result.tree);
    }

    #[test]
    fn test_reorder_onto_next_sibling_is_noop() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "A"), &uid(&tree, "B"))
            .expect("reorder should succeed");
        assert!(result.is_unchanged());
        assert!(result.ops.is_empty());
        assert_eq!(result.tree, tree);
    }

    #[test]
    fn test_self_move_is_noop() {
        let tree = sample();
        let users = uid(&tree, "Users");
        let result = move_item(&tree, &users, &users).expect("self move should succeed");
        assert!(result.is_unchanged());
        assert_eq!(result.tree, tree);
    }

    #[test]
    fn test_missing_uids_fail() {
        let tree = sample();
        let a = uid(&tree, "A");
        assert_eq!(
            move_item(&tree, "missing", &a),
            Err(TreeError::NotFound("missing".to_string()))
        );
        assert_eq!(
            move_item(&tree, &a, "missing"),
            Err(TreeError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_request_onto_request_in_other_folder() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "B"), &uid(&tree, "Create"))
            .expect("move should succeed");

        let moved = find_item(&result.tree, &uid(&tree, "B")).expect("moved request exists");
        assert_eq!(moved.pathname(), "/api/users/b.json");
        assert_eq!(order_of(folder_items(&result.tree, "Users")), vec!["List", "B", "Create"]);
        assert_eq!(order_of(&result.tree.items), vec!["A", "C"]);

        assert_eq!(
            result.ops[0],
            PersistenceOp::Move {
                uid: uid(&tree, "B"),
                old_path: "/api/b.json".to_string(),
                new_parent_dir: "/api/users".to_string(),
                kind: ItemKind::Request,
            }
        );
        assert_eq!(
            result.ops[1],
            PersistenceOp::Resequence(vec![SeqAssignment {
                uid: uid(&tree, "C"),
                seq: 2,
                pathname: "/api/c.json".to_string(),
            }])
        );
        // B keeps seq 2, which is also its new position.
        assert_eq!(
            result.ops[2],
            PersistenceOp::Resequence(vec![SeqAssignment {
                uid: uid(&tree, "Create"),
                seq: 3,
                pathname: "/api/users/create.json".to_string(),
            }])
        );
        assert_eq!(seq_of(&result.tree, "B"), Some(2));
        assert_clean(&result.tree);
    }

    #[test]
    fn test_request_onto_root_request() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "List"), &uid(&tree, "B"))
            .expect("move should succeed");
        assert_eq!(order_of(&result.tree.items), vec!["A", "List", "B", "C"]);
        assert_eq!(order_of(folder_items(&result.tree, "Users")), vec!["Create"]);
        assert_eq!(seq_of(&result.tree, "Create"), Some(1));
        assert_clean(&result.tree);
    }

    #[test]
    fn test_request_collision_in_destination() {
        let mut tree = sample();
        if let Some(Item::Folder(orders)) = tree.items.get_mut(4) {
            let path = orders.pathname.clone();
            orders.add_item(Request::new("Other A", "a.json", &path, 2).into());
        }
        let result = move_item(&tree, &uid(&tree, "A"), &uid(&tree, "Get"));
        assert_eq!(
            result,
            Err(TreeError::DuplicateName {
                filename: "a.json".to_string(),
                parent: "/api/orders".to_string(),
            })
        );
    }

    #[test]
    fn test_request_into_own_folder_is_noop() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "List"), &uid(&tree, "Users"))
            .expect("drop should succeed");
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_request_into_folder_appends() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "A"), &uid(&tree, "Users"))
            .expect("move should succeed");
        assert_eq!(order_of(folder_items(&result.tree, "Users")), vec!["List", "Create", "A"]);
        assert_eq!(seq_of(&result.tree, "A"), Some(3));
        assert_eq!(seq_of(&result.tree, "B"), Some(1));
        assert_eq!(seq_of(&result.tree, "C"), Some(2));
        assert_clean(&result.tree);
    }

    #[test]
    fn test_folder_into_folder_repaths_subtree() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Orders"))
            .expect("move should succeed");

        let ban = find_item(&result.tree, &uid(&tree, "Ban")).expect("descendant survives");
        assert_eq!(ban.pathname(), "/api/orders/admin/ban.json");
        let parent = find_parent(&result.tree, &uid(&tree, "Admin")).and_then(|p| p.folder_uid());
        assert_eq!(parent, Some(uid(&tree, "Orders").as_str()));
        assert_eq!(
            result.ops,
            vec![PersistenceOp::Move {
                uid: uid(&tree, "Admin"),
                old_path: "/api/users/admin".to_string(),
                new_parent_dir: "/api/orders".to_string(),
                kind: ItemKind::Folder,
            }]
        );
        assert_clean(&result.tree);
    }

    #[test]
    fn test_folder_into_current_parent_is_noop() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Users"))
            .expect("drop should succeed");
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_folder_into_descendant_is_invalid() {
        let tree = sample();
        let users = uid(&tree, "Users");
        let admin = uid(&tree, "Admin");
        assert_eq!(
            move_item(&tree, &users, &admin),
            Err(TreeError::InvalidMove {
                dragged: users.clone(),
                target: admin,
            })
        );
        assert!(matches!(
            move_item(&tree, &users, &uid(&tree, "Ban")),
            Err(TreeError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_folder_collision_in_destination() {
        let mut tree = sample();
        if let Some(Item::Folder(orders)) = tree.items.get_mut(4) {
            let path = orders.pathname.clone();
            orders.add_item(Folder::new("Other Admin", "admin", &path).into());
        }
        assert!(matches!(
            move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Orders")),
            Err(TreeError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_folder_onto_sibling_request_is_noop() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "Orders"), &uid(&tree, "A"))
            .expect("drop should succeed");
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_folder_onto_root_request_moves_to_root() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "A"))
            .expect("move should succeed");
        let admin = find_item(&result.tree, &uid(&tree, "Admin")).expect("folder survives");
        assert_eq!(admin.pathname(), "/api/admin");
        assert!(find_parent(&result.tree, admin.uid()).is_some_and(|p| p.is_root()));
        assert_clean(&result.tree);
    }

    #[test]
    fn test_folder_onto_request_in_other_folder_is_noop() {
        let tree = sample();
        let result = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Get"))
            .expect("drop should succeed");
        assert!(result.is_unchanged());
        assert!(result.ops.is_empty());
        assert_eq!(result.tree, tree);

        let result = move_item(&tree, &uid(&tree, "Orders"), &uid(&tree, "List"))
            .expect("drop should succeed");
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_move_under_drive_root() {
        let mut tree = Collection::new("API", "C:\\work\\api");
        tree.add_item(Request::new("A", "a.json", "C:\\work\\api", 1).into());
        let mut users = Folder::new("Users", "users", "C:\\work\\api");
        let list = Request::new("List", "list.json", &users.pathname, 1);
        users.add_item(list.into());
        tree.add_item(users.into());

        let result = move_item(&tree, &uid(&tree, "A"), &uid(&tree, "Users"))
            .expect("move should succeed");
        let a = find_item(&result.tree, &uid(&tree, "A")).expect("request survives");
        assert_eq!(a.pathname(), "C:\\work\\api\\users\\a.json");
        assert_eq!(a.seq(), Some(2));
        assert!(misplaced_paths(&result.tree).is_empty());
        assert!(matches!(
            &result.ops[0],
            PersistenceOp::Move { new_parent_dir, .. } if new_parent_dir == "C:\\work\\api\\users"
        ));
    }

    #[test]
    fn test_move_folder_under_unc_root() {
        let root = "\\\\server\\share\\api";
        let mut tree = Collection::new("API", root);
        let mut users = Folder::new("Users", "users", root);
        let mut admin = Folder::new("Admin", "admin", &users.pathname);
        let ban = Request::new("Ban", "ban.json", &admin.pathname, 1);
        admin.add_item(ban.into());
        users.add_item(admin.into());
        tree.add_item(users.into());
        tree.add_item(Folder::new("Orders", "orders", root).into());

        let result = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Orders"))
            .expect("move should succeed");
        let ban = find_item(&result.tree, &uid(&tree, "Ban")).expect("descendant survives");
        assert_eq!(ban.pathname(), "\\\\server\\share\\api\\orders\\admin\\ban.json");
        assert!(misplaced_paths(&result.tree).is_empty());
    }

    #[test]
    fn test_move_to_root() {
        let tree = sample();
        let result =
            move_item_to_root(&tree, &uid(&tree, "List")).expect("move to root should succeed");
        assert_eq!(order_of(&result.tree.items), vec!["A", "B", "C", "List"]);
        assert_eq!(seq_of(&result.tree, "List"), Some(4));
        assert_eq!(seq_of(&result.tree, "Create"), Some(1));
        assert_eq!(result.ops[0].name(), "move");
        assert_clean(&result.tree);
    }

    #[test]
    fn test_move_to_root_when_already_there() {
        let tree = sample();
        let result = move_item_to_root(&tree, &uid(&tree, "A")).expect("noop should succeed");
        assert!(result.is_unchanged());
        assert!(move_item_to_root(&tree, "missing").is_err());
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let tree = sample();
        let before = tree.clone();
        let _ = move_item(&tree, &uid(&tree, "Admin"), &uid(&tree, "Orders"));
        let _ = move_item(&tree, &uid(&tree, "C"), &uid(&tree, "A"));
        assert_eq!(tree, before);
    }
}
