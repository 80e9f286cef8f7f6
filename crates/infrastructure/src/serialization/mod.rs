//! Deterministic JSON serialization for collection files.
//!
//! Keeps diffs of a collection directory small:
//! - Record fields are declared in alphabetical order
//! - 2-space indentation
//! - Trailing newline
//! - UTF-8 encoding without BOM

mod json;

pub use json::{SerializationError, from_json, to_json_stable};
