//! Check command implementation.

use regstore_core::RecordStore;

/// Runs the check command.
pub fn run(store: &RecordStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking {} application(s)...", store.len());

    match store.check_coherence() {
        Ok(()) => {
            let stats = store.stats();
            println!(
                "  insertion order, id index and name index agree ({} histories)",
                stats.records_with_history
            );
            println!();
            println!("✓ Store check passed");
            Ok(())
        }
        Err(e) => {
            println!("  {e}");
            println!();
            println!("✗ Store check failed");
            Err("Check failed".into())
        }
    }
}
