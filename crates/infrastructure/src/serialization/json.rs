//! JSON encoding of collection records.

use arbor_application::ports::PersistenceError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b"  ";

/// Failure to turn a record into text or back.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// A record could not be written as JSON.
    #[error("cannot encode record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A file did not hold the expected record.
    #[error("cannot decode record: {0}")]
    Deserialize(serde_json::Error),

    /// The encoder produced bytes that are not UTF-8.
    #[error("encoded record is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<SerializationError> for PersistenceError {
    fn from(error: SerializationError) -> Self {
        match error {
            SerializationError::Deserialize(_) => Self::InvalidData(error.to_string()),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// Encodes a record the way every collection file is stored: two-space
/// indentation, fields in declaration order, one trailing newline.
///
/// # Errors
/// Returns `Serialize` if the value cannot be represented as JSON.
pub fn to_json_stable<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut out = Vec::with_capacity(256);
    value.serialize(&mut Serializer::with_formatter(
        &mut out,
        PrettyFormatter::with_indent(INDENT),
    ))?;
    out.push(b'\n');
    Ok(String::from_utf8(out)?)
}

/// Decodes a record; key order and whitespace in the input do not matter.
///
/// # Errors
/// Returns `Deserialize` for malformed JSON or a shape mismatch.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}
