//! Error types for regstore core.

use regstore_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in regstore core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No record with this id exists.
    #[error("record not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A record with this id already exists.
    #[error("duplicate record id: {id}")]
    DuplicateKey {
        /// The colliding id.
        id: String,
    },

    /// The record has no revision to undo.
    #[error("no revision to undo for record {id}")]
    NoRevision {
        /// The record id.
        id: String,
    },

    /// A required field was empty.
    #[error("invalid input: {field} must not be empty")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Persisted history for `id` holds a snapshot of another record.
    #[error("corrupt revision history: {id} holds a snapshot of {found}")]
    CorruptHistory {
        /// The history key.
        id: String,
        /// The id carried by the offending snapshot.
        found: String,
    },

    /// The log and the indexes disagree. This is a bug, never user error.
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// Description of the desync.
        message: String,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Snapshot encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(id: impl Into<String>) -> Self {
        Self::DuplicateKey { id: id.into() }
    }

    /// Creates a no revision error.
    pub fn no_revision(id: impl Into<String>) -> Self {
        Self::NoRevision { id: id.into() }
    }

    /// Creates a corrupt history error.
    pub fn corrupt_history(id: impl Into<String>, found: impl Into<String>) -> Self {
        Self::CorruptHistory {
            id: id.into(),
            found: found.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's input rather than
    /// by the store or its storage.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::DuplicateKey { .. }
                | Self::NoRevision { .. }
                | Self::InvalidInput { .. }
        )
    }
}
