//! # regstore Storage
//!
//! Snapshot storage backends for regstore.
//!
//! Backends are **opaque byte stores** holding one snapshot each. They do
//! not interpret the bytes they hold; `regstore_core` owns the record and
//! revision formats.
//!
//! ## Design Principles
//!
//! - A backend holds at most one snapshot, replaced whole on every write
//! - A backend that was never written reads back as `None`, not an error
//! - Writes are all-or-nothing: a reader sees the old or the new snapshot
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - Persistent storage using atomic file replacement
//!
//! ## Example
//!
//! ```rust
//! use regstore_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read_all().unwrap().is_none());
//!
//! backend.write_all(b"[]").unwrap();
//! assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"[]"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
