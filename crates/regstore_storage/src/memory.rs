//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    snapshot: Option<Vec<u8>>,
    closed: bool,
    writes: u64,
}

/// An in-memory storage backend.
///
/// This backend keeps its snapshot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same snapshot, so a test can keep a handle to a backend
/// it has handed to a store and inspect what was saved. [`close`] makes
/// every subsequent write fail, which is how tests exercise save failures.
///
/// [`close`]: InMemoryBackend::close
///
/// # Example
///
/// ```rust
/// use regstore_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
/// backend.write_all(b"test data").unwrap();
/// assert_eq!(observer.size().unwrap(), 9);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    shared: Arc<RwLock<Shared>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing snapshot.
    ///
    /// Useful for testing load paths.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        let backend = Self::new();
        backend.shared.write().snapshot = Some(data);
        backend
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.shared.read().snapshot.clone()
    }

    /// Returns the number of successful writes since creation.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.shared.read().writes
    }

    /// Closes the backend. Reads keep working; writes fail with
    /// [`StorageError::Closed`] until [`reopen`](Self::reopen).
    pub fn close(&self) {
        self.shared.write().closed = true;
    }

    /// Reopens a closed backend.
    pub fn reopen(&self) {
        self.shared.write().closed = false;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.shared.read().snapshot.clone())
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut shared = self.shared.write();
        if shared.closed {
            return Err(StorageError::Closed);
        }
        shared.snapshot = Some(data.to_vec());
        shared.writes += 1;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self
            .shared
            .read()
            .snapshot
            .as_ref()
            .map_or(0, |data| data.len() as u64))
    }
}
