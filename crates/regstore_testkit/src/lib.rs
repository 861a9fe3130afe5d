//! # regstore Testkit
//!
//! Test utilities for regstore.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Property-based test generators using proptest
//! - A model-checking harness comparing a store with a naive model
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use regstore_testkit::prelude::*;
//!
//! let mut harness = ModelHarness::new();
//! harness.run(&[StoreOperation::Submit { draft: draft("Ana", "JKT") }]);
//! harness.verify_all();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
pub use stress::*;
