//! Store statistics.
//!
//! Provides status breakdowns, per-region and per-day submission counts,
//! and operation counters for monitoring a store.
//!
//! # Usage
//!
//! ```rust,ignore
//! let stats = store.stats();
//! println!("pending: {} ({}%)", stats.pending, stats.percentage(Status::Pending));
//! for region in stats.by_region.iter().take(5) {
//!     println!("{}: {}", region.region, region.count);
//! }
//! ```

use crate::record::{Record, Status};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Counters of store operations since the store was opened.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationCounts {
    /// Successful submits.
    pub submits: u64,
    /// Successful verifications (already-verified calls excluded).
    pub verifies: u64,
    /// Successful edits.
    pub edits: u64,
    /// Successful undos.
    pub undos: u64,
    /// Saves that failed and left the store degraded.
    pub failed_saves: u64,
}

impl OperationCounts {
    pub(crate) fn record_submit(&mut self) {
        self.submits += 1;
    }

    pub(crate) fn record_verify(&mut self) {
        self.verifies += 1;
    }

    pub(crate) fn record_edit(&mut self) {
        self.edits += 1;
    }

    pub(crate) fn record_undo(&mut self) {
        self.undos += 1;
    }

    pub(crate) fn record_failed_save(&mut self) {
        self.failed_saves += 1;
    }
}

/// Number of records in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    /// Region name.
    pub region: String,
    /// Records in the region.
    pub count: usize,
}

/// Number of records submitted on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// Calendar day (UTC).
    pub day: NaiveDate,
    /// Records submitted that day.
    pub count: usize,
}

/// Point-in-time statistics of a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total records.
    pub total: usize,
    /// Records with status `pending`.
    pub pending: usize,
    /// Records with status `verified`.
    pub verified: usize,
    /// Records with status `revision`.
    pub revision: usize,
    /// Records per region, largest first, ties by region name.
    pub by_region: Vec<RegionCount>,
    /// Records per submission day, oldest first.
    pub by_day: Vec<DayCount>,
    /// Records with undo history.
    pub records_with_history: usize,
    /// Snapshots held across all histories.
    pub snapshots: usize,
    /// Operation counters.
    pub operations: OperationCounts,
}

impl StoreStats {
    pub(crate) fn collect<'a>(
        records: impl Iterator<Item = &'a Record>,
        records_with_history: usize,
        snapshots: usize,
        operations: OperationCounts,
    ) -> Self {
        let mut stats = Self {
            total: 0,
            pending: 0,
            verified: 0,
            revision: 0,
            by_region: Vec::new(),
            by_day: Vec::new(),
            records_with_history,
            snapshots,
            operations,
        };
        let mut regions: HashMap<&str, usize> = HashMap::new();
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();

        for record in records {
            stats.total += 1;
            match record.status() {
                Status::Pending => stats.pending += 1,
                Status::Verified => stats.verified += 1,
                Status::Revision => stats.revision += 1,
            }
            *regions.entry(record.region()).or_default() += 1;
            if let Some(day) = utc_day(record.submitted_at()) {
                *days.entry(day).or_default() += 1;
            }
        }

        stats.by_region = regions
            .into_iter()
            .map(|(region, count)| RegionCount {
                region: region.to_owned(),
                count,
            })
            .collect();
        stats
            .by_region
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.region.cmp(&b.region)));
        stats.by_day = days
            .into_iter()
            .map(|(day, count)| DayCount { day, count })
            .collect();
        stats
    }

    /// Returns the number of records with `status`.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::Verified => self.verified,
            Status::Revision => self.revision,
        }
    }

    /// Returns the share of records with `status`, as a whole percentage
    /// rounded half up. Zero for an empty store.
    #[must_use]
    pub fn percentage(&self, status: Status) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.count(status) * 200 + self.total) / (2 * self.total)
    }

    /// Returns the `n` largest regions.
    #[must_use]
    pub fn top_regions(&self, n: usize) -> &[RegionCount] {
        &self.by_region[..n.min(self.by_region.len())]
    }

    /// Returns the `n` most recent days, oldest first.
    #[must_use]
    pub fn recent_days(&self, n: usize) -> &[DayCount] {
        &self.by_day[self.by_day.len().saturating_sub(n)..]
    }
}

/// Converts epoch milliseconds to a UTC calendar day.
pub(crate) fn utc_day(millis: u64) -> Option<NaiveDate> {
    let millis = i64::try_from(millis).ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|at| at.date_naive())
}
