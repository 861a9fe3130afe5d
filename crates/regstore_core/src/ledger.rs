//! Revision ledger: per-record undo history.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use std::collections::{BTreeMap, HashMap};

/// Persisted form of the ledger: record id to snapshots, oldest first.
pub type RevisionMap = BTreeMap<String, Vec<Record>>;

/// Per-record stacks of pre-edit snapshots.
///
/// An id is present only while it has at least one snapshot: popping the
/// last snapshot removes the id, so "has history" and "id present" are the
/// same question. Stacks are unbounded.
#[derive(Debug, Default)]
pub struct RevisionLedger {
    stacks: HashMap<String, Vec<Record>>,
}

impl RevisionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from its persisted form. Empty stacks are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptHistory`] if a stack holds a snapshot
    /// whose id differs from the stack's key.
    pub fn from_map(map: RevisionMap) -> CoreResult<Self> {
        let mut stacks = HashMap::with_capacity(map.len());
        for (id, stack) in map {
            if let Some(foreign) = stack.iter().find(|snapshot| snapshot.id() != id) {
                return Err(CoreError::corrupt_history(id, foreign.id()));
            }
            if !stack.is_empty() {
                stacks.insert(id, stack);
            }
        }
        Ok(Self { stacks })
    }

    /// Returns the persisted form, ordered by id.
    #[must_use]
    pub fn to_map(&self) -> RevisionMap {
        self.stacks
            .iter()
            .map(|(id, stack)| (id.clone(), stack.clone()))
            .collect()
    }

    /// Pushes a snapshot onto `id`'s stack.
    pub fn push(&mut self, id: &str, snapshot: Record) {
        self.stacks.entry(id.to_owned()).or_default().push(snapshot);
    }

    /// Returns the most recent snapshot for `id` without removing it.
    #[must_use]
    pub fn peek(&self, id: &str) -> Option<&Record> {
        self.stacks.get(id).and_then(|stack| stack.last())
    }

    /// Pops the most recent snapshot for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoRevision`] if `id` has no history.
    pub fn pop(&mut self, id: &str) -> CoreResult<Record> {
        let stack = self
            .stacks
            .get_mut(id)
            .ok_or_else(|| CoreError::no_revision(id))?;
        let snapshot = stack.pop().ok_or_else(|| CoreError::no_revision(id))?;
        if stack.is_empty() {
            self.stacks.remove(id);
        }
        Ok(snapshot)
    }

    /// Returns how many snapshots `id` has.
    #[must_use]
    pub fn depth(&self, id: &str) -> usize {
        self.stacks.get(id).map_or(0, Vec::len)
    }

    /// Returns true if `id` has at least one snapshot.
    #[must_use]
    pub fn has_history(&self, id: &str) -> bool {
        self.stacks.contains_key(id)
    }

    /// Iterates ids that have history, in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.stacks.keys().map(String::as_str)
    }

    /// Returns the number of ids with history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns true if no id has history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Returns the total number of snapshots across all ids.
    #[must_use]
    pub fn total_snapshots(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

}
