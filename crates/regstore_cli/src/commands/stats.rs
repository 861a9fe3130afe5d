//! Statistics commands: stats, report.

use crate::output::{print_json, table_header, table_row, Format};
use chrono::NaiveDate;
use regstore_core::{Record, RecordStore, Status, StoreStats};
use serde::Serialize;

const TOP_REGIONS: usize = 5;
const RECENT_DAYS: usize = 7;

/// Applications submitted on one day.
#[derive(Debug, Serialize)]
pub struct DailyReport<'a> {
    /// The reported day (UTC).
    pub date: NaiveDate,
    /// Number of applications submitted that day.
    pub total: usize,
    /// Pending applications among them.
    pub pending: usize,
    /// Verified applications among them.
    pub verified: usize,
    /// Applications under revision among them.
    pub revision: usize,
    /// The applications, in submission order.
    pub records: Vec<&'a Record>,
}

impl<'a> DailyReport<'a> {
    fn new(date: NaiveDate, records: Vec<&'a Record>) -> Self {
        let count = |status: Status| records.iter().filter(|r| r.status() == status).count();
        Self {
            date,
            total: records.len(),
            pending: count(Status::Pending),
            verified: count(Status::Verified),
            revision: count(Status::Revision),
            records,
        }
    }
}

/// Runs the stats command.
pub fn run(store: &RecordStore, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let stats = store.stats();
    match format {
        Format::Json => print_json(&stats)?,
        Format::Text => print_stats(&stats),
    }
    Ok(())
}

/// Runs the report command.
pub fn report(
    store: &RecordStore,
    date: NaiveDate,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = DailyReport::new(date, store.submitted_on(date));
    match format {
        Format::Json => print_json(&report)?,
        Format::Text => {
            println!("Applications submitted on {date}");
            println!("================================");
            println!(
                "Total: {}  (pending {}, verified {}, revision {})",
                report.total, report.pending, report.verified, report.revision
            );
            if !report.records.is_empty() {
                println!();
                println!("{}", table_header());
                for record in &report.records {
                    println!("{}", table_row(record));
                }
            }
        }
    }
    Ok(())
}

fn print_stats(stats: &StoreStats) {
    println!("Registry Statistics");
    println!("===================");
    println!();
    println!("Applications: {}", stats.total);
    for status in Status::ALL {
        println!(
            "  {:<9} {:>6}  ({:>3}%)",
            status,
            stats.count(status),
            stats.percentage(status)
        );
    }
    println!();
    println!("Top regions:");
    for region in stats.top_regions(TOP_REGIONS) {
        println!("  {:<12} {:>6}", region.region, region.count);
    }
    println!();
    println!("Recent days:");
    for day in stats.recent_days(RECENT_DAYS) {
        println!("  {}   {:>6}", day.day, day.count);
    }
    println!();
    println!(
        "History: {} application(s) with {} undoable revision(s)",
        stats.records_with_history, stats.snapshots
    );
}
