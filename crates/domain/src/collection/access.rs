//! Read-only lookups over a collection tree.
//!
//! Every lookup fails softly: absence is an expected outcome (for instance an
//! item deleted while a drag was in progress), so these return `Option` or
//! `bool` rather than errors.

use super::item::{Collection, Folder, Item};

/// The container that directly holds an item.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    /// The item sits at the collection root.
    Root(&'a Collection),
    /// The item sits inside a folder.
    Folder(&'a Folder),
}

impl<'a> Parent<'a> {
    /// Uid of the container; the collection uid for the root.
    #[must_use]
    pub fn uid(&self) -> &'a str {
        match self {
            Self::Root(c) => &c.uid,
            Self::Folder(f) => &f.uid,
        }
    }

    /// Directory of the container.
    #[must_use]
    pub fn pathname(&self) -> &'a str {
        match self {
            Self::Root(c) => &c.pathname,
            Self::Folder(f) => &f.pathname,
        }
    }

    /// Children of the container.
    #[must_use]
    pub fn items(&self) -> &'a [Item] {
        match self {
            Self::Root(c) => &c.items,
            Self::Folder(f) => &f.items,
        }
    }

    /// Returns true for the collection root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root(_))
    }

    /// Uid of the folder, or `None` for the collection root.
    #[must_use]
    pub fn folder_uid(&self) -> Option<&'a str> {
        match self {
            Self::Root(_) => None,
            Self::Folder(f) => Some(&f.uid),
        }
    }
}

/// Depth-first search for an item by uid.
#[must_use]
pub fn find_item<'a>(tree: &'a Collection, uid: &str) -> Option<&'a Item> {
    find_in_items(&tree.items, uid)
}

fn find_in_items<'a>(items: &'a [Item], uid: &str) -> Option<&'a Item> {
    for item in items {
        if item.uid() == uid {
            return Some(item);
        }
        if let Item::Folder(folder) = item {
            if let Some(found) = find_in_items(&folder.items, uid) {
                return Some(found);
            }
        }
    }
    None
}

/// Depth-first search for an item by its full pathname.
#[must_use]
pub fn find_item_by_pathname<'a>(tree: &'a Collection, pathname: &str) -> Option<&'a Item> {
    fn walk<'a>(items: &'a [Item], pathname: &str) -> Option<&'a Item> {
        items.iter().find_map(|item| {
            if item.pathname() == pathname {
                Some(item)
            } else {
                walk(item.children(), pathname)
            }
        })
    }
    walk(&tree.items, pathname)
}

/// Returns the container holding the item, including the root.
#[must_use]
pub fn find_parent<'a>(tree: &'a Collection, uid: &str) -> Option<Parent<'a>> {
    if tree.items.iter().any(|item| item.uid() == uid) {
        return Some(Parent::Root(tree));
    }
    find_parent_folder(tree, uid).map(Parent::Folder)
}

/// Returns the folder holding the item, or `None` if the item is at the root
/// or does not exist.
#[must_use]
pub fn find_parent_folder<'a>(tree: &'a Collection, uid: &str) -> Option<&'a Folder> {
    fn walk<'a>(items: &'a [Item], uid: &str) -> Option<&'a Folder> {
        for item in items {
            if let Item::Folder(folder) = item {
                if folder.items.iter().any(|child| child.uid() == uid) {
                    return Some(folder);
                }
                if let Some(found) = walk(&folder.items, uid) {
                    return Some(found);
                }
            }
        }
        None
    }
    walk(&tree.items, uid)
}

/// Returns true if `ancestor_uid` is a strict ancestor of `uid`.
///
/// Walks the parent chain from `uid` up to the root.
#[must_use]
pub fn is_ancestor(tree: &Collection, ancestor_uid: &str, uid: &str) -> bool {
    let mut current = uid;
    while let Some(parent) = find_parent_folder(tree, current) {
        if parent.uid == ancestor_uid {
            return true;
        }
        current = &parent.uid;
    }
    false
}

/// Returns true if the item is a request.
#[must_use]
pub const fn is_request(item: &Item) -> bool {
    item.is_request()
}

/// Returns true if the item is a folder.
#[must_use]
pub const fn is_folder(item: &Item) -> bool {
    item.is_folder()
}

/// Finds a folder by uid; requests and missing uids yield `None`.
#[must_use]
pub fn find_folder<'a>(tree: &'a Collection, uid: &str) -> Option<&'a Folder> {
    match find_item(tree, uid)? {
        Item::Folder(folder) => Some(folder),
        Item::Request(_) => None,
    }
}

/// Mutable access to the children of a container; `None` addresses the root.
pub(crate) fn container_items_mut<'a>(
    tree: &'a mut Collection,
    folder_uid: Option<&str>,
) -> Option<&'a mut Vec<Item>> {
    match folder_uid {
        None => Some(&mut tree.items),
        Some(uid) => match find_item_mut(&mut tree.items, uid)? {
            Item::Folder(folder) => Some(&mut folder.items),
            Item::Request(_) => None,
        },
    }
}

/// Mutable depth-first search for an item by uid.
pub(crate) fn find_item_mut<'a>(items: &'a mut [Item], uid: &str) -> Option<&'a mut Item> {
    for item in items {
        if item.uid() == uid {
            return Some(item);
        }
        if let Item::Folder(folder) = item {
            if let Some(found) = find_item_mut(&mut folder.items, uid) {
                return Some(found);
            }
        }
    }
    None
}
