//! Uid generation.

use uuid::Uuid;

/// Generates a fresh uid for a tree node.
///
/// Uids are UUID v7 strings, so uids minted later sort after earlier ones.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
