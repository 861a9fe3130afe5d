//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend path cannot hold a snapshot file.
    #[error("invalid snapshot path: {0}")]
    InvalidPath(String),

    /// The storage is closed.
    #[error("storage is closed")]
    Closed,
}
