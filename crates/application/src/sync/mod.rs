//! Synchronization between the in-memory tree and the persistence collaborator.

mod bridge;
mod pending;

pub use bridge::{SyncBridge, SyncFailure};
pub use pending::PendingSet;
