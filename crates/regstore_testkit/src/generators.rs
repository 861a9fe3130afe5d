//! Property-based test generators using proptest.
//!
//! Provides strategies for generating drafts and operation sequences
//! against a record store.

use proptest::prelude::*;
use regstore_core::RecordDraft;

/// Names drawn from a small pool so generated stores have duplicate names.
const NAME_POOL: [&str; 6] = ["Ana", "Bo", "Cy", "Dewi", "Eka", "Siti"];

/// Region codes used by generated drafts.
const REGION_POOL: [&str; 4] = ["JKT", "BDG", "SBY", "MDN"];

/// Strategy for applicant names. Mostly from a small pool, sometimes fresh.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(NAME_POOL.to_vec()).prop_map(String::from),
        1 => prop::string::string_regex("[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8})?")
            .expect("Invalid regex"),
    ]
}

/// Strategy for region codes.
pub fn region_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(REGION_POOL.to_vec()).prop_map(String::from)
}

/// Strategy for street addresses.
pub fn address_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("Jl\\. [A-Z][a-z]{2,10} [1-9][0-9]{0,2}").expect("Invalid regex")
}

/// Strategy for drafts with every field filled.
pub fn valid_draft_strategy() -> impl Strategy<Value = RecordDraft> {
    (name_strategy(), address_strategy(), region_strategy())
        .prop_map(|(name, address, region)| RecordDraft::new(name, address, region))
}

/// Strategy for drafts that are occasionally missing a field.
pub fn draft_strategy() -> impl Strategy<Value = RecordDraft> {
    prop_oneof![
        9 => valid_draft_strategy(),
        1 => (valid_draft_strategy(), 0..3usize).prop_map(|(mut draft, field)| {
            match field {
                0 => draft.name = String::new(),
                1 => draft.address = "   ".to_string(),
                _ => draft.region = String::new(),
            }
            draft
        }),
    ]
}

/// One operation against a record store.
///
/// Operations that address an existing record carry a `target` index that
/// is reduced modulo the number of submitted records when applied, so every
/// generated sequence is meaningful regardless of how many submits precede
/// it.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Submit a new record
    Submit {
        /// The draft
        draft: RecordDraft,
    },
    /// Verify a record
    Verify {
        /// Index of the target record
        target: usize,
    },
    /// Edit a record
    Edit {
        /// Index of the target record
        target: usize,
        /// The new fields
        draft: RecordDraft,
    },
    /// Undo the latest edit of a record
    Undo {
        /// Index of the target record
        target: usize,
    },
}

/// Strategy for a single store operation.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        3 => draft_strategy().prop_map(|draft| StoreOperation::Submit { draft }),
        1 => any::<usize>().prop_map(|target| StoreOperation::Verify { target }),
        3 => (any::<usize>(), draft_strategy())
            .prop_map(|(target, draft)| StoreOperation::Edit { target, draft }),
        2 => any::<usize>().prop_map(|target| StoreOperation::Undo { target }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
