//! Arbor Application - Persistence ports, synchronization and sessions
//!
//! This crate connects the pure mutation engine to storage. It defines the
//! ports a storage adapter implements, the bridge that runs persistence
//! commands in order, and the session that owns an open collection.

pub mod config;
pub mod error;
pub mod ports;
pub mod session;
pub mod sync;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{FailurePolicy, SyncConfig};
pub use error::{ApplicationError, ApplicationResult};
pub use session::CollectionSession;
pub use use_cases::OpenCollection;
