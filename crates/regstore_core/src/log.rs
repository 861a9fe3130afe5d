//! Ordered log: record storage in submission order.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::types::Locator;
use std::cmp::Ordering;

/// Dense, append-only arena of records in submission order.
///
/// The log owns every record in the store. Indexes refer to records by
/// [`Locator`]; slot `n` always holds the `n`th submitted record, so
/// insertion order is plain slot order.
///
/// Re-sorting is never done in place. [`sorted_by`](Self::sorted_by)
/// returns a view and leaves slots, and therefore every locator, untouched.
#[derive(Debug, Default)]
pub struct OrderedLog {
    slots: Vec<Record>,
    generation: u32,
}

impl OrderedLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log whose locators carry `generation`.
    #[must_use]
    pub fn with_generation(generation: u32) -> Self {
        Self {
            slots: Vec::new(),
            generation,
        }
    }

    /// Appends a record and returns its locator.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the slot space is exhausted.
    pub fn append(&mut self, record: Record) -> CoreResult<Locator> {
        let slot = u32::try_from(self.slots.len())
            .map_err(|_| CoreError::invariant("ordered log slot space exhausted"))?;
        self.slots.push(record);
        Ok(Locator::new(slot, self.generation))
    }

    /// Resolves a locator. Returns `None` for locators from another
    /// generation or past the end.
    #[must_use]
    pub fn get(&self, locator: Locator) -> Option<&Record> {
        if locator.generation() != self.generation {
            return None;
        }
        self.slots.get(locator.slot() as usize)
    }

    /// Resolves a locator for in-place mutation.
    pub fn get_mut(&mut self, locator: Locator) -> Option<&mut Record> {
        if locator.generation() != self.generation {
            return None;
        }
        self.slots.get_mut(locator.slot() as usize)
    }

    /// Iterates records in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.slots.iter()
    }

    /// Iterates `(locator, record)` pairs in submission order.
    pub fn entries(&self) -> impl Iterator<Item = (Locator, &Record)> + '_ {
        let generation = self.generation;
        self.slots
            .iter()
            .enumerate()
            .map(move |(slot, record)| (Locator::new(slot as u32, generation), record))
    }

    /// Returns a stably sorted view of all records.
    ///
    /// Records that compare equal keep their submission order.
    pub fn sorted_by<F>(&self, mut compare: F) -> Vec<&Record>
    where
        F: FnMut(&Record, &Record) -> Ordering,
    {
        let mut view: Vec<&Record> = self.slots.iter().collect();
        view.sort_by(|a, b| compare(a, b));
        view
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the current generation.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns a copy of every record in submission order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Record> {
        self.slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordDraft;

    fn record(id: &str, region: &str, at: u64) -> Record {
        Record::new(id, RecordDraft::new(id, "addr", region), at)
    }

    #[test]
    fn append_and_get() {
        let mut log = OrderedLog::new();
        let a = log.append(record("A", "R1", 10)).unwrap();
        let b = log.append(record("B", "R2", 20)).unwrap();

        assert_eq!(a.slot(), 0);
        assert_eq!(b.slot(), 1);
        assert_eq!(log.get(b).unwrap().id(), "B");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn iter_preserves_submission_order() {
        let mut log = OrderedLog::new();
        for id in ["C", "A", "B"] {
            log.append(record(id, "R", 0)).unwrap();
        }
        let ids: Vec<_> = log.iter().map(Record::id).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[test]
    fn get_mut_is_visible_through_get() {
        let mut log = OrderedLog::new();
        let loc = log.append(record("A", "R", 0)).unwrap();

        log.get_mut(loc)
            .unwrap()
            .set_status(crate::record::Status::Verified);
        assert_eq!(log.get(loc).unwrap().status(), crate::record::Status::Verified);
    }

    #[test]
    fn sorted_view_is_stable_and_non_destructive() {
        let mut log = OrderedLog::new();
        let first = log.append(record("A", "R2", 30)).unwrap();
        log.append(record("B", "R1", 20)).unwrap();
        log.append(record("C", "R2", 10)).unwrap();

        let by_region: Vec<_> = log
            .sorted_by(|a, b| a.region().cmp(b.region()))
            .into_iter()
            .map(Record::id)
            .collect();
        // A and C tie on region and keep submission order
        assert_eq!(by_region, ["B", "A", "C"]);

        // Storage order and locators are untouched
        assert_eq!(log.get(first).unwrap().id(), "A");
        let ids: Vec<_> = log.iter().map(Record::id).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn with_generation_rejects_older_locators() {
        let mut first = OrderedLog::new();
        let old = first.append(record("A", "R", 0)).unwrap();

        let mut second = OrderedLog::with_generation(first.generation() + 1);
        second.append(record("A", "R", 0)).unwrap();
        assert!(second.get(old).is_none());
    }

    #[test]
    fn out_of_range_locator_is_none() {
        let log = OrderedLog::new();
        assert!(log.get(Locator::new(3, 0)).is_none());
    }

    #[test]
    fn entries_pair_locators_with_records() {
        let mut log = OrderedLog::new();
        let a = log.append(record("A", "R", 0)).unwrap();
        let b = log.append(record("B", "R", 0)).unwrap();

        let locs: Vec<_> = log.entries().map(|(loc, _)| loc).collect();
        assert_eq!(locs, [a, b]);
    }
}
