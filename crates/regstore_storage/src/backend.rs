//! Storage backend trait definition.

use crate::error::StorageResult;

/// A snapshot storage backend for regstore.
///
/// Storage backends are **opaque byte stores** holding a single snapshot.
/// regstore owns all format interpretation - backends do not understand
/// records, revisions or JSON.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes of the last successful `write_all`
/// - `read_all` returns `None` if nothing was ever written
/// - A failed `write_all` leaves the previous snapshot intact
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the current snapshot.
    ///
    /// Returns `None` if the backend has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the current snapshot with `data`.
    ///
    /// After this returns successfully the new snapshot is durable to the
    /// degree the backend supports.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous snapshot is kept.
    fn write_all(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the size of the current snapshot in bytes (0 if absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
