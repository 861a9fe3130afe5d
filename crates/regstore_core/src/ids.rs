//! Record id generators.

use crate::clock::{Clock, SystemClock};
use uuid::Uuid;

/// Produces ids for new records.
///
/// The store calls [`next`](IdGenerator::next) exactly once per submit.
/// Generators are not required to be collision free; the store rejects a
/// colliding id with [`CoreError::DuplicateKey`](crate::CoreError::DuplicateKey).
pub trait IdGenerator {
    /// Returns an id for a new record in `region`.
    fn next(&mut self, region: &str) -> String;
}

/// `"{region}-{epoch_millis}"` ids.
///
/// Two submissions for the same region within one millisecond collide.
#[derive(Debug, Default)]
pub struct TimestampIds<C: Clock = SystemClock> {
    clock: C,
}

impl TimestampIds {
    /// Creates a generator on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> TimestampIds<C> {
    /// Creates a generator reading the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for TimestampIds<C> {
    fn next(&mut self, region: &str) -> String {
        format!("{region}-{}", self.clock.now_millis())
    }
}

/// `"{region}-{uuid}"` ids using random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next(&mut self, region: &str) -> String {
        format!("{region}-{}", Uuid::new_v4())
    }
}

/// `"{region}-{n:06}"` ids from a counter shared across regions.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a generator whose first id uses `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next(&mut self, region: &str) -> String {
        let id = format!("{region}-{:06}", self.next);
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next(&mut self, region: &str) -> String {
        (**self).next(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn timestamp_ids_follow_clock() {
        let mut ids = TimestampIds::with_clock(ManualClock::new(1_700_000_000_123));
        assert_eq!(ids.next("JKT"), "JKT-1700000000123");
    }

    #[test]
    fn system_timestamp_ids_carry_region_and_millis() {
        let id = TimestampIds::new().next("SBY");
        let millis: u64 = id.strip_prefix("SBY-").unwrap().parse().unwrap();
        assert!(millis > 1_577_836_800_000);
    }

    #[test]
    fn timestamp_ids_collide_within_a_millisecond() {
        let mut ids = TimestampIds::with_clock(ManualClock::new(42));
        assert_eq!(ids.next("R1"), ids.next("R1"));
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidIds;
        let a = ids.next("BDG");
        let b = ids.next("BDG");
        assert!(a.starts_with("BDG-"));
        assert_ne!(a, b);
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next("A"), "A-000007");
        assert_eq!(ids.next("B"), "B-000008");
    }

    #[test]
    fn boxed_generator() {
        let mut ids: Box<dyn IdGenerator> = Box::new(SequentialIds::default());
        assert_eq!(ids.next("X"), "X-000000");
    }
}
