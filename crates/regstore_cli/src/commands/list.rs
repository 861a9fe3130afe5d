//! Listing commands: list, search.

use crate::output::{print_records, Format};
use clap::ValueEnum;
use regstore_core::{Record, RecordStore};

/// Order for the list command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    /// Submission order
    Insertion,
    /// Name, then id
    Name,
    /// Region, then submission order
    Region,
    /// Submission time, oldest first
    Time,
}

/// Runs the list command.
pub fn run(
    store: &RecordStore,
    order: Order,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    print_records(&ordered(store, order), format)
}

/// Runs the search command.
pub fn search(
    store: &RecordStore,
    query: &str,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let hits = store.search(query);
    tracing::debug!(query, hits = hits.len(), "search finished");
    print_records(&hits, format)
}

fn ordered(store: &RecordStore, order: Order) -> Vec<&Record> {
    match order {
        Order::Insertion => store.list_by_insertion_order().collect(),
        Order::Name => store.list_by_name().collect(),
        Order::Region => store.list_by_region(),
        Order::Time => store.list_by_submission_time(),
    }
}
