//! Application error types

use arbor_domain::TreeError;
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The mutation was rejected before anything changed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// The persistence collaborator rejected an operation.
    ///
    /// The in-memory tree already reflects the mutation when this is raised.
    #[error("persistence failed during {operation}: {reason}")]
    Persistence {
        /// Name of the failing operation.
        operation: String,
        /// Message reported by the collaborator.
        reason: String,
    },

    /// A persistence operation did not finish within the configured limit.
    #[error("persistence timed out during {operation}")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
    },

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApplicationError {
    /// Returns true for errors raised after the in-memory tree was updated.
    #[must_use]
    pub const fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Persistence { .. } | Self::Timeout { .. })
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
