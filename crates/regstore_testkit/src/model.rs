//! Model-checking harness.
//!
//! [`ModelHarness`] applies operations to a real [`RecordStore`] and to a
//! naive reference model side by side, and asserts after every step that
//! the two agree on every listing order and every undo depth.

use crate::fixtures::{assert_views_agree, TestStore};
use crate::generators::StoreOperation;
use regstore_core::{Clock, CoreError, Record, RecordDraft, RecordStore, Status, Verification};
use std::collections::HashMap;

/// Clock step between operations, so submission times differ.
const STEP_MILLIS: u64 = 1_000;

/// A test harness pairing a store with a reference model.
pub struct ModelHarness {
    /// The store under test.
    pub test: TestStore,
    /// Expected records in submission order.
    records: Vec<Record>,
    /// Expected undo stacks per id.
    history: HashMap<String, Vec<Record>>,
}

impl ModelHarness {
    /// Creates a harness over an empty in-memory store.
    pub fn new() -> Self {
        Self {
            test: TestStore::memory(),
            records: Vec::new(),
            history: HashMap::new(),
        }
    }

    /// Returns the store under test.
    pub fn store(&self) -> &RecordStore {
        &self.test.store
    }

    /// Returns the expected records in submission order.
    pub fn expected(&self) -> &[Record] {
        &self.records
    }

    /// Applies one operation to both the store and the model, asserting
    /// that the store's result matches the model's.
    pub fn apply(&mut self, op: &StoreOperation) {
        self.test.clock.advance(STEP_MILLIS);
        match op {
            StoreOperation::Submit { draft } => self.submit(draft),
            StoreOperation::Verify { target } => self.verify(*target),
            StoreOperation::Edit { target, draft } => self.edit(*target, draft),
            StoreOperation::Undo { target } => self.undo(*target),
        }
    }

    /// Applies every operation in order, checking the full state after each.
    pub fn run(&mut self, ops: &[StoreOperation]) {
        for op in ops {
            self.apply(op);
            self.verify_all();
        }
    }

    /// Asserts that the store matches the model in every view.
    pub fn verify_all(&self) {
        let store = self.store();
        assert_views_agree(store);

        let insertion: Vec<&Record> = store.list_by_insertion_order().collect();
        assert_eq!(insertion, self.records.iter().collect::<Vec<_>>());

        let mut by_name: Vec<&Record> = self.records.iter().collect();
        by_name.sort_by(|a, b| (a.name(), a.id()).cmp(&(b.name(), b.id())));
        assert_eq!(store.list_by_name().collect::<Vec<_>>(), by_name);

        let mut by_region: Vec<&Record> = self.records.iter().collect();
        by_region.sort_by(|a, b| a.region().cmp(b.region()));
        assert_eq!(store.list_by_region(), by_region);

        let mut by_time: Vec<&Record> = self.records.iter().collect();
        by_time.sort_by_key(|r| r.submitted_at());
        assert_eq!(store.list_by_submission_time(), by_time);

        for record in &self.records {
            let depth = self.history.get(record.id()).map_or(0, Vec::len);
            assert_eq!(store.revision_depth(record.id()), depth, "depth of {}", record.id());
        }
    }

    fn target(&self, index: usize) -> Option<String> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.records[index % self.records.len()].id().to_owned())
        }
    }

    fn position(&self, id: &str) -> usize {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .expect("model holds every submitted id")
    }

    fn submit(&mut self, draft: &RecordDraft) {
        let result = self.test.store.submit(draft.clone());
        if draft.validate().is_err() {
            assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
            return;
        }

        let id = result.expect("valid submit succeeds").into_value();
        let expected = Record::new(id.clone(), draft.clone(), self.test.clock.now_millis());
        assert_eq!(self.test.store.get(&id), Some(&expected));
        self.records.push(expected);
    }

    fn verify(&mut self, target: usize) {
        let Some(id) = self.target(target) else {
            assert!(matches!(
                self.test.store.verify("missing"),
                Err(CoreError::NotFound { .. })
            ));
            return;
        };

        let outcome = self.test.store.verify(&id).expect("verify succeeds").into_value();
        let pos = self.position(&id);
        if self.records[pos].status() == Status::Verified {
            assert_eq!(outcome, Verification::AlreadyVerified);
        } else {
            assert_eq!(outcome, Verification::Verified);
            self.records[pos] = self.records[pos].clone().with_status(Status::Verified);
        }
    }

    fn edit(&mut self, target: usize, draft: &RecordDraft) {
        let Some(id) = self.target(target) else {
            return;
        };

        let result = self.test.store.edit(&id, draft.clone());
        if draft.validate().is_err() {
            assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
            return;
        }

        let pos = self.position(&id);
        let before = self.records[pos].clone();
        let after = Record::new(id.clone(), draft.clone(), before.submitted_at())
            .with_status(Status::Revision);
        assert_eq!(result.expect("valid edit succeeds").into_value(), after);

        self.history.entry(id).or_default().push(before);
        self.records[pos] = after;
    }

    fn undo(&mut self, target: usize) {
        let Some(id) = self.target(target) else {
            return;
        };

        let result = self.test.store.undo(&id);
        match self.history.get_mut(&id).and_then(Vec::pop) {
            Some(snapshot) => {
                assert_eq!(result.expect("undo succeeds").into_value(), snapshot);
                let pos = self.position(&id);
                self.records[pos] = snapshot;
                if self.history.get(&id).is_some_and(Vec::is_empty) {
                    self.history.remove(&id);
                }
            }
            None => assert!(matches!(result, Err(CoreError::NoRevision { .. }))),
        }
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}
