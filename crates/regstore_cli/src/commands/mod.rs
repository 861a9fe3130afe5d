//! CLI command implementations.

pub mod check;
pub mod list;
pub mod records;
pub mod stats;
