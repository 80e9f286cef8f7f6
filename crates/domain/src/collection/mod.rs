//! The collection tree: folders and requests mirroring a directory on disk.

pub mod access;
pub mod invariants;
mod item;
mod naming;

pub use access::{
    Parent, find_folder, find_item, find_item_by_pathname, find_parent, find_parent_folder,
    is_ancestor, is_folder, is_request,
};
pub use item::{Collection, Folder, Item, ItemKind, Request, Uid};
pub use naming::{REQUEST_EXTENSION, RESERVED_FILENAMES, folder_dirname, request_filename};
