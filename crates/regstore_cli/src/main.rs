//! regstore CLI
//!
//! Command-line front end for the application registry.
//!
//! # Commands
//!
//! - `submit` - Register a new application
//! - `verify` - Mark an application as verified
//! - `edit` - Change an application's fields
//! - `undo` - Revert the most recent edit of an application
//! - `show` - Display one application and its history depth
//! - `list` - List applications in one of four orders
//! - `search` - Find applications by id or name
//! - `stats` - Status, region and per-day statistics
//! - `report` - Applications submitted on a given day
//! - `check` - Verify that the store's views agree

mod commands;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use output::Format;
use regstore_core::{CoreError, CoreResult, JsonPersistence, RecordStore, StoreConfig, UuidIds};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Identity-card application registry.
#[derive(Parser)]
#[command(name = "regstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding applications.json and revisions.json
    #[arg(global = true, short, long, env = "REGSTORE_PATH", default_value = "data")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Id scheme for new applications
    #[arg(global = true, long, value_enum, default_value_t = IdScheme::Timestamp)]
    ids: IdScheme,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IdScheme {
    /// `{region}-{epoch millis}`
    Timestamp,
    /// `{region}-{uuid v4}`
    Uuid,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new application
    Submit {
        /// Applicant name
        #[arg(short, long)]
        name: String,

        /// Applicant address
        #[arg(short, long)]
        address: String,

        /// Region code
        #[arg(short, long)]
        region: String,
    },

    /// Mark an application as verified
    Verify {
        /// Application id
        id: String,
    },

    /// Change an application's fields; omitted fields keep their value
    Edit {
        /// Application id
        id: String,

        /// New applicant name
        #[arg(short, long)]
        name: Option<String>,

        /// New applicant address
        #[arg(short, long)]
        address: Option<String>,

        /// New region code
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Revert the most recent edit of an application
    Undo {
        /// Application id
        id: String,
    },

    /// Display one application
    Show {
        /// Application id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List applications
    List {
        /// Listing order
        #[arg(short, long, value_enum, default_value_t = commands::list::Order::Insertion)]
        order: commands::list::Order,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Find applications whose id or name contains QUERY
    Search {
        /// Case-insensitive search text
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show registry statistics
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List applications submitted on a day (UTC)
    Report {
        /// Day as YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Verify that the store's views agree
    Check,

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let status = exit_status(err.as_ref());
            if status == EXIT_USAGE {
                eprintln!("error: {err}");
            } else {
                tracing::error!(error = %err, "command failed");
            }
            ExitCode::from(status)
        }
    }
}

/// Exit status for caller mistakes such as an unknown id.
const EXIT_USAGE: u8 = 2;
/// Exit status for storage, data and internal failures.
const EXIT_FAILURE: u8 = 1;

/// Maps a command error to the process exit status.
fn exit_status(err: &(dyn std::error::Error + 'static)) -> u8 {
    match err.downcast_ref::<CoreError>() {
        Some(core) if core.is_user_error() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Version = cli.command {
        println!("regstore CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("regstore Core v{}", regstore_core::VERSION);
        return Ok(());
    }

    let mut store = open_store(&cli)?;

    match cli.command {
        Commands::Submit {
            name,
            address,
            region,
        } => commands::records::submit(&mut store, name, address, region)?,
        Commands::Verify { id } => commands::records::verify(&mut store, &id)?,
        Commands::Edit {
            id,
            name,
            address,
            region,
        } => commands::records::edit(&mut store, &id, name, address, region)?,
        Commands::Undo { id } => commands::records::undo(&mut store, &id)?,
        Commands::Show { id, format } => commands::records::show(&store, &id, format)?,
        Commands::List { order, format } => commands::list::run(&store, order, format)?,
        Commands::Search { query, format } => commands::list::search(&store, &query, format)?,
        Commands::Stats { format } => commands::stats::run(&store, format)?,
        Commands::Report { date, format } => commands::stats::report(&store, date, format)?,
        Commands::Check => commands::check::run(&store)?,
        Commands::Version => {}
    }

    Ok(())
}

fn open_store(cli: &Cli) -> CoreResult<RecordStore> {
    tracing::debug!(path = %cli.path.display(), "opening record store");
    let config = StoreConfig::default();
    let persistence = JsonPersistence::open_dir(&cli.path, &config)?;
    let builder = RecordStore::builder(persistence).config(config);
    match cli.ids {
        IdScheme::Timestamp => builder.open(),
        IdScheme::Uuid => builder.ids(UuidIds).open(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_exit_with_usage_status() {
        let not_found: Box<dyn std::error::Error> = Box::new(CoreError::not_found("JKT-1"));
        assert_eq!(exit_status(not_found.as_ref()), EXIT_USAGE);

        let corrupt: Box<dyn std::error::Error> = Box::new(CoreError::corrupt_history("A", "B"));
        assert_eq!(exit_status(corrupt.as_ref()), EXIT_FAILURE);

        let other: Box<dyn std::error::Error> = "save failed".into();
        assert_eq!(exit_status(other.as_ref()), EXIT_FAILURE);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "regstore", "list", "--order", "name", "--path", "/tmp/x", "--ids", "uuid",
        ]);
        assert_eq!(cli.path, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.ids, IdScheme::Uuid));
        assert!(matches!(
            cli.command,
            Commands::List {
                order: commands::list::Order::Name,
                format: Format::Text
            }
        ));
    }

    #[test]
    fn parses_report_date() {
        let cli = Cli::parse_from(["regstore", "report", "--date", "2024-06-01"]);
        match cli.command {
            Commands::Report { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
            }
            _ => panic!("expected report"),
        }
    }
}
