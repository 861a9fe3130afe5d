//! Stress tests for regstore.
//!
//! These helpers drive a store through long operation runs, mostly to show
//! that the name index stays usable when names arrive in sorted order.

use crate::fixtures::draft;
use regstore_core::RecordStore;
use std::time::{Duration, Instant};

/// Outcome of a stress run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Operations that returned `Ok`.
    pub successful_ops: usize,
    /// Operations that returned an error. Some workloads expect these,
    /// for example undo on a record with no history left.
    pub failed_ops: usize,
    /// Wall time of the measured phase.
    pub duration: Duration,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful_ops: usize, failed_ops: usize, duration: Duration) -> Self {
        Self {
            successful_ops,
            failed_ops,
            duration,
        }
    }

    /// Returns the number of operations attempted.
    pub fn total_ops(&self) -> usize {
        self.successful_ops + self.failed_ops
    }

    /// Returns throughput, or zero if the run took no measurable time.
    pub fn ops_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.total_ops() as f64 / secs
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for StressTestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ops ({} ok, {} failed) in {:?}, {:.0} ops/sec",
            self.total_ops(),
            self.successful_ops,
            self.failed_ops,
            self.duration,
            self.ops_per_second()
        )
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of distinct applicant names.
    pub distinct_names: usize,
    /// Number of records created before a mixed run.
    pub record_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            distinct_names: 500,
            record_count: 1_000,
        }
    }
}

fn name_for(i: usize, config: &StressConfig) -> String {
    format!("Applicant {:06}", i % config.distinct_names.max(1))
}

/// Submits `config.operations` records whose names arrive in ascending
/// order, the worst case for an unbalanced name index.
pub fn stress_sorted_submits(store: &mut RecordStore, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let name = format!("Applicant {i:06}");
        match store.submit(draft(&name, "JKT")) {
            Ok(_) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Runs a mixed edit/undo/verify workload over `config.record_count`
/// pre-submitted records.
pub fn stress_mixed_operations(store: &mut RecordStore, config: &StressConfig) -> StressTestResult {
    let mut ids = Vec::with_capacity(config.record_count);
    for i in 0..config.record_count {
        if let Ok(m) = store.submit(draft(&name_for(i, config), "BDG")) {
            ids.push(m.into_value());
        }
    }
    if ids.is_empty() {
        return StressTestResult::new(0, 0, Duration::ZERO);
    }

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let id = &ids[i % ids.len()];
        let result = match i % 4 {
            // Edit (50%), renaming so the name index is rekeyed
            0 | 1 => store
                .edit(id, draft(&name_for(i * 7, config), "BDG"))
                .map(|_| ()),
            // Undo (25%); fails once a record's history is exhausted
            2 => store.undo(id).map(|_| ()),
            // Verify (25%)
            _ => store.verify(id).map(|_| ()),
        };

        match result {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assert_views_agree, TestStore};

    fn small_config() -> StressConfig {
        StressConfig {
            operations: 400,
            distinct_names: 20,
            record_count: 50,
        }
    }

    #[test]
    fn test_sorted_submits() {
        let mut store = TestStore::memory();
        let result = stress_sorted_submits(&mut store, &small_config());
        assert_eq!(result.successful_ops, 400);
        assert_eq!(store.len(), 400);
        assert_views_agree(&store);
    }

    #[test]
    fn test_mixed_operations() {
        let mut store = TestStore::memory();
        let result = stress_mixed_operations(&mut store, &small_config());
        assert_eq!(result.total_ops(), 400);
        assert!(result.to_string().starts_with("400 ops"));
        assert!(result.successful_ops > 0);
        assert_views_agree(&store);
    }
}
