//! # regstore Core
//!
//! In-process store for identity-card application records.
//!
//! This crate provides:
//! - An ordered log that owns records in submission order
//! - A primary index from record id to log slot
//! - A name index (binary search tree) kept live across renames
//! - A per-record revision ledger with LIFO undo
//! - JSON snapshot persistence over [`regstore_storage`] backends
//! - Status, region and per-day statistics
//!
//! All mutations go through [`RecordStore`], which keeps the three views
//! of the record set in agreement.
//!
//! ## Example
//!
//! ```rust
//! use regstore_core::{RecordDraft, RecordStore, Status};
//!
//! let mut store = RecordStore::open_in_memory().unwrap();
//! let id = store
//!     .submit(RecordDraft::new("Budi", "Jl. Sudirman 5", "BDG"))
//!     .unwrap()
//!     .into_value();
//!
//! store.verify(&id).unwrap();
//! assert_eq!(store.get(&id).unwrap().status(), Status::Verified);
//! assert_eq!(store.list_by_name().count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod ids;
mod index;
mod ledger;
mod log;
mod persistence;
mod record;
mod stats;
mod store;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{IdGenerator, SequentialIds, TimestampIds, UuidIds};
pub use index::{NameIndex, NameIter, PrimaryIndex};
pub use ledger::{RevisionLedger, RevisionMap};
pub use log::OrderedLog;
pub use persistence::{JsonPersistence, Persistence};
pub use record::{Record, RecordDraft, Status};
pub use stats::{DayCount, OperationCounts, RegionCount, StoreStats};
pub use store::{ByName, Mutation, RecordStore, StoreBuilder, Verification};
pub use types::Locator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
