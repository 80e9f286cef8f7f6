//! Arbor Infrastructure - Adapters and implementations
//!
//! This crate provides the file system backed implementations of the ports
//! defined in the application layer.

pub mod persistence;
pub mod serialization;

pub use persistence::{
    COLLECTION_FILE, CURRENT_SCHEMA_VERSION, FOLDER_FILE, FileSystemPersistence, TokioFileSystem,
};
pub use serialization::{SerializationError, from_json, to_json_stable};
