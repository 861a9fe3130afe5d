//! Shared output formatting.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use regstore_core::Record;
use serde::Serialize;

/// Output format for commands that print records or statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable table
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints records as a table, or as a JSON array.
pub fn print_records(
    records: &[&Record],
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => print_json(records),
        Format::Text => {
            if records.is_empty() {
                println!("No applications.");
                return Ok(());
            }
            println!("{}", table_header());
            for record in records {
                println!("{}", table_row(record));
            }
            println!();
            println!("{} application(s)", records.len());
            Ok(())
        }
    }
}

pub fn table_header() -> String {
    format!(
        "{:<28} {:<24} {:<8} {:<9} {}",
        "ID", "NAME", "REGION", "STATUS", "SUBMITTED (UTC)"
    )
}

pub fn table_row(record: &Record) -> String {
    format!(
        "{:<28} {:<24} {:<8} {:<9} {}",
        record.id(),
        truncate(record.name(), 24),
        record.region(),
        record.status(),
        format_millis(record.submitted_at())
    )
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM`.
pub fn format_millis(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regstore_core::RecordDraft;

    #[test]
    fn format_millis_renders_utc() {
        assert_eq!(format_millis(1_717_200_000_000), "2024-06-01 00:00");
        assert_eq!(format_millis(u64::MAX), "-");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Ana", 5), "Ana");
        assert_eq!(truncate("Anastasia", 5), "Anas…");
    }

    #[test]
    fn row_contains_fields() {
        let record = Record::new(
            "JKT-1",
            RecordDraft::new("Ana", "Jl. Merdeka", "JKT"),
            1_717_200_000_000,
        );
        let row = table_row(&record);
        assert!(row.starts_with("JKT-1"));
        assert!(row.contains("pending"));
        assert!(row.ends_with("2024-06-01 00:00"));
    }
}
