//! Persistence implementations.

mod collection_store;
mod file_system;
pub(crate) mod records;

pub use collection_store::FileSystemPersistence;
pub use file_system::TokioFileSystem;
pub use records::{COLLECTION_FILE, CURRENT_SCHEMA_VERSION, FOLDER_FILE};
