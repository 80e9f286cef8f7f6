//! Arbor Domain - Collection tree model and mutation engine
//!
//! This crate defines the in-memory tree of folders and requests that mirrors
//! a collection directory, the path arithmetic used to address it, and the
//! pure mutations that reshape it. Nothing here performs I/O: mutations return
//! the new tree together with the persistence commands that would make the
//! file system match it.

pub mod collection;
pub mod error;
pub mod id;
pub mod mutation;
pub mod path;

pub use collection::{Collection, Folder, Item, ItemKind, Parent, Request, Uid};
pub use error::{TreeError, TreeResult};
pub use id::generate_id;
pub use mutation::{MutationResult, Outcome, PersistenceOp, SeqAssignment};
pub use path::{ParsedPath, PathKind};
