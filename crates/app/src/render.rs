//! Text rendering of a collection tree.

use std::fmt::Write;

use arbor_domain::mutation::display_order;
use arbor_domain::{Collection, Item};

/// Folders first, then requests in display order; each level indented by two spaces.
pub fn render_tree(tree: &Collection, show_uids: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", tree.name, uid_suffix(&tree.uid, show_uids));
    render_items(&tree.items, 1, show_uids, &mut out);
    out
}

fn render_items(items: &[Item], depth: usize, show_uids: bool, out: &mut String) {
    let indent = "  ".repeat(depth);

    for item in items {
        if let Item::Folder(folder) = item {
            let _ = writeln!(
                out,
                "{indent}{}/ {}{}",
                folder.filename,
                folder.name,
                uid_suffix(&folder.uid, show_uids)
            );
            render_items(&folder.items, depth + 1, show_uids, out);
        }
    }

    for request in display_order(items) {
        let _ = writeln!(
            out,
            "{indent}{}. {} ({}){}",
            request.seq,
            request.name,
            request.filename,
            uid_suffix(&request.uid, show_uids)
        );
    }
}

fn uid_suffix(uid: &str, show: bool) -> String {
    if show { format!("  [{uid}]") } else { String::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_domain::{Folder, Request};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_tree() {
        let mut tree = Collection::new("API", "/api");
        tree.add_item(Request::new("Second", "second.json", "/api", 2).into());
        tree.add_item(Request::new("First", "first.json", "/api", 1).into());
        let mut users = Folder::new("Users", "users", "/api");
        let list = Request::new("List", "list.json", &users.pathname, 1);
        users.add_item(list.into());
        tree.add_item(users.into());

        assert_eq!(
            render_tree(&tree, false),
            "API\n  users/ Users\n    1. List (list.json)\n  1. First (first.json)\n  2. Second (second.json)\n"
        );
    }

    #[test]
    fn test_render_with_uids() {
        let tree = Collection::new("API", "/api");
        assert_eq!(render_tree(&tree, true), format!("API  [{}]\n", tree.uid));
    }
}
