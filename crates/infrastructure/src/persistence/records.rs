//! On-disk record types.
//!
//! Fields are ordered alphabetically for deterministic serialization.

use arbor_domain::{Collection, Folder, Request};
use serde::{Deserialize, Serialize};

/// Current version of the file format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Metadata file at the collection root.
pub const COLLECTION_FILE: &str = "collection.json";

/// Metadata file inside each folder directory.
pub const FOLDER_FILE: &str = "folder.json";

/// Contents of `collection.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Collection uid.
    pub id: String,
    /// Collection name.
    pub name: String,
    /// Schema version for migration support.
    pub schema_version: u32,
}

impl From<&Collection> for CollectionRecord {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.uid.clone(),
            name: collection.name.clone(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Contents of `folder.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    /// Folder uid.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Schema version for migration support.
    pub schema_version: u32,
}

impl From<&Folder> for FolderRecord {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.uid.clone(),
            name: folder.name.clone(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Contents of a request file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Request uid.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Opaque request definition.
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Schema version for migration support.
    pub schema_version: u32,
    /// Position among sibling requests.
    pub seq: u32,
}

impl From<&Request> for RequestRecord {
    fn from(request: &Request) -> Self {
        Self {
            id: request.uid.clone(),
            name: request.name.clone(),
            payload: request.payload.clone(),
            schema_version: CURRENT_SCHEMA_VERSION,
            seq: request.seq,
        }
    }
}
