//! Collection item types

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::path;

/// Unique identifier of a node within a collection.
pub type Uid = String;

/// A request leaf. Requests are ordered among their siblings by `seq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier
    pub uid: Uid,
    /// Display name
    pub name: String,
    /// File name on disk, independent of `name`
    pub filename: String,
    /// Full path, always `join(parent.pathname, filename)`
    pub pathname: String,
    /// 1-based position among request siblings
    pub seq: u32,
    /// Request definition; carried through create and clone, never interpreted
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Request {
    /// Creates a request under `parent_path` with a fresh uid.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        parent_path: &str,
        seq: u32,
    ) -> Self {
        let filename = filename.into();
        Self {
            uid: generate_id(),
            name: name.into(),
            pathname: path::join(&[parent_path, filename.as_str()]),
            filename,
            seq,
            payload: serde_json::Value::Null,
        }
    }

    /// Sets the request payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub(crate) fn repath(&mut self, parent_path: &str) {
        self.pathname = path::join(&[parent_path, self.filename.as_str()]);
    }
}

/// A folder containing requests and other folders.
///
/// Folders carry no `seq`; their relative order is not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier
    pub uid: Uid,
    /// Display name
    pub name: String,
    /// Directory name on disk
    pub filename: String,
    /// Full path, always `join(parent.pathname, filename)`
    pub pathname: String,
    /// Items in this folder
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Folder {
    /// Creates an empty folder under `parent_path` with a fresh uid.
    #[must_use]
    pub fn new(name: impl Into<String>, filename: impl Into<String>, parent_path: &str) -> Self {
        let filename = filename.into();
        Self {
            uid: generate_id(),
            name: name.into(),
            pathname: path::join(&[parent_path, filename.as_str()]),
            filename,
            items: Vec::new(),
        }
    }

    /// Adds an item to this folder.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Recomputes `pathname` for this folder and every descendant.
    pub(crate) fn repath(&mut self, parent_path: &str) {
        self.pathname = path::join(&[parent_path, self.filename.as_str()]);
        for child in &mut self.items {
            child.repath(&self.pathname);
        }
    }

    /// Deep copy with a fresh uid on every node of the subtree.
    #[must_use]
    pub fn with_fresh_uids(&self) -> Self {
        Self {
            uid: generate_id(),
            name: self.name.clone(),
            filename: self.filename.clone(),
            pathname: self.pathname.clone(),
            items: self.items.iter().map(Item::with_fresh_uids).collect(),
        }
    }
}

/// Discriminant of an [`Item`], used in persistence commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A folder
    Folder,
    /// A request
    Request,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::Request => write!(f, "request"),
        }
    }
}

/// An item in a collection (either a folder or a request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// A folder containing other items
    Folder(Folder),
    /// A request leaf
    Request(Request),
}

impl Item {
    /// Returns the uid of this item.
    #[must_use]
    pub fn uid(&self) -> &str {
        match self {
            Self::Folder(f) => &f.uid,
            Self::Request(r) => &r.uid,
        }
    }

    /// Returns the display name of this item.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Request(r) => &r.name,
        }
    }

    /// Returns the on-disk name of this item.
    #[must_use]
    pub fn filename(&self) -> &str {
        match self {
            Self::Folder(f) => &f.filename,
            Self::Request(r) => &r.filename,
        }
    }

    /// Returns the full path of this item.
    #[must_use]
    pub fn pathname(&self) -> &str {
        match self {
            Self::Folder(f) => &f.pathname,
            Self::Request(r) => &r.pathname,
        }
    }

    /// Returns the sequence number; folders have none.
    #[must_use]
    pub const fn seq(&self) -> Option<u32> {
        match self {
            Self::Folder(_) => None,
            Self::Request(r) => Some(r.seq),
        }
    }

    /// Returns the kind of this item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::Request(_) => ItemKind::Request,
        }
    }

    /// Returns true if this item is a request.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Returns true if this item is a folder.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Returns the children of a folder; requests have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Folder(f) => &f.items,
            Self::Request(_) => &[],
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Folder(f) => f.name = name,
            Self::Request(r) => r.name = name,
        }
    }

    pub(crate) fn set_filename(&mut self, filename: String) {
        match self {
            Self::Folder(f) => f.filename = filename,
            Self::Request(r) => r.filename = filename,
        }
    }

    /// Recomputes `pathname` for this item and, for folders, every descendant.
    pub(crate) fn repath(&mut self, parent_path: &str) {
        match self {
            Self::Request(r) => r.repath(parent_path),
            Self::Folder(f) => f.repath(parent_path),
        }
    }

    /// Deep copy with a fresh uid on every node of the subtree.
    #[must_use]
    pub fn with_fresh_uids(&self) -> Self {
        match self {
            Self::Request(r) => Self::Request(Request {
                uid: generate_id(),
                ..r.clone()
            }),
            Self::Folder(f) => Self::Folder(f.with_fresh_uids()),
        }
    }
}

impl From<Folder> for Item {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Request> for Item {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

/// The root aggregate: one project's tree, backed by a root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub uid: Uid,
    /// Collection name
    pub name: String,
    /// Root directory
    pub pathname: String,
    /// Top-level items
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    /// Creates an empty collection rooted at `pathname`.
    #[must_use]
    pub fn new(name: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            uid: generate_id(),
            name: name.into(),
            pathname: pathname.into(),
            items: Vec::new(),
        }
    }

    /// Adds an item to the collection root.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Returns the total number of requests in the collection (recursive).
    #[must_use]
    pub fn request_count(&self) -> usize {
        fn count_in_items(items: &[Item]) -> usize {
            items.iter().fold(0, |acc, item| {
                acc + match item {
                    Item::Request(_) => 1,
                    Item::Folder(f) => count_in_items(&f.items),
                }
            })
        }
        count_in_items(&self.items)
    }

    /// Returns the path family of the collection root.
    #[must_use]
    pub fn path_kind(&self) -> path::PathKind {
        path::PathKind::classify(&self.pathname)
    }
}
