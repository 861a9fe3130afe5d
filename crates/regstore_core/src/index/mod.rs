//! Index implementations for access paths.
//!
//! Indexes hold [`Locator`](crate::Locator)s into the ordered log, never
//! record copies, so an update made through one access path is visible
//! through every other.
//!
//! # Index Types
//!
//! - [`PrimaryIndex`]: O(1) unique lookup by record id
//! - [`NameIndex`]: ordered traversal by name, duplicates allowed
//!
//! Both are maintained by the record store alone; nothing else mutates them.

mod name;
mod primary;

pub use name::{Iter as NameIter, NameIndex};
pub use primary::PrimaryIndex;
