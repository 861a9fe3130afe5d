//! Single-application commands: submit, verify, edit, undo, show.

use crate::output::{format_millis, print_json, Format};
use regstore_core::{CoreError, Record, RecordDraft, RecordStore, Verification};
use serde::Serialize;

/// One application plus its undo depth, as printed by `show`.
#[derive(Debug, Serialize)]
struct ShowResult<'a> {
    #[serde(flatten)]
    record: &'a Record,
    revisions: usize,
}

/// Runs the submit command.
pub fn submit(
    store: &mut RecordStore,
    name: String,
    address: String,
    region: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let (id, save_error) = store
        .submit(RecordDraft::new(name, address, region))?
        .into_parts();
    ensure_saved(save_error)?;
    println!("Submitted application {id}");
    Ok(())
}

/// Runs the verify command.
pub fn verify(store: &mut RecordStore, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (outcome, save_error) = store.verify(id)?.into_parts();
    ensure_saved(save_error)?;
    match outcome {
        Verification::Verified => println!("Application {id} verified"),
        Verification::AlreadyVerified => println!("Application {id} was already verified"),
    }
    Ok(())
}

/// Runs the edit command. Fields left as `None` keep their current value.
pub fn edit(
    store: &mut RecordStore,
    id: &str,
    name: Option<String>,
    address: Option<String>,
    region: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let current = store
        .get(id)
        .map(Record::draft)
        .ok_or_else(|| CoreError::not_found(id))?;
    let draft = RecordDraft {
        name: name.unwrap_or(current.name),
        address: address.unwrap_or(current.address),
        region: region.unwrap_or(current.region),
    };

    let (_, save_error) = store.edit(id, draft)?.into_parts();
    ensure_saved(save_error)?;
    println!(
        "Application {id} updated ({} revision(s) to undo)",
        store.revision_depth(id)
    );
    Ok(())
}

/// Runs the undo command.
pub fn undo(store: &mut RecordStore, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (restored, save_error) = store.undo(id)?.into_parts();
    ensure_saved(save_error)?;
    println!(
        "Application {id} restored: {} / {} / {} ({})",
        restored.name(),
        restored.address(),
        restored.region(),
        restored.status()
    );
    Ok(())
}

/// Runs the show command.
pub fn show(
    store: &RecordStore,
    id: &str,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = store.get(id).ok_or_else(|| CoreError::not_found(id))?;
    let result = ShowResult {
        record,
        revisions: store.revision_depth(id),
    };

    match format {
        Format::Json => print_json(&result)?,
        Format::Text => {
            println!("Application {}", record.id());
            println!("  Name:      {}", record.name());
            println!("  Address:   {}", record.address());
            println!("  Region:    {}", record.region());
            println!("  Status:    {}", record.status());
            println!("  Submitted: {} UTC", format_millis(record.submitted_at()));
            println!("  Revisions: {}", result.revisions);
        }
    }
    Ok(())
}

/// A mutation that was applied but not written would be lost when the
/// process exits, so it fails the command.
fn ensure_saved(save_error: Option<CoreError>) -> Result<(), Box<dyn std::error::Error>> {
    match save_error {
        Some(e) => Err(format!("change could not be saved: {e}").into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regstore_core::{Status, StoreConfig};

    fn store(dir: &std::path::Path) -> RecordStore {
        RecordStore::open_dir(dir, StoreConfig::default()).unwrap()
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        submit(&mut store, "Ana".into(), "Jl. A".into(), "JKT".into()).unwrap();
        let id = store.list_by_insertion_order().next().unwrap().id().to_owned();

        edit(&mut store, &id, None, Some("Jl. B".into()), None).unwrap();

        let record = store.get(&id).unwrap();
        assert_eq!(record.name(), "Ana");
        assert_eq!(record.address(), "Jl. B");
        assert_eq!(record.region(), "JKT");
        assert_eq!(record.status(), Status::Revision);
    }

    #[test]
    fn commands_persist_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut store = store(dir.path());
            submit(&mut store, "Ana".into(), "Jl. A".into(), "JKT".into()).unwrap();
            let id = store.list_by_insertion_order().next().unwrap().id().to_owned();
            verify(&mut store, &id).unwrap();
            id
        };

        let mut store = store(dir.path());
        assert_eq!(store.get(&id).unwrap().status(), Status::Verified);
        assert!(undo(&mut store, &id).is_err());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        assert!(edit(&mut store, "nope", Some("X".into()), None, None).is_err());
        assert!(show(&store, "nope", Format::Text).is_err());
    }

    #[test]
    fn ensure_saved_fails_on_error() {
        assert!(ensure_saved(None).is_ok());
        let err = ensure_saved(Some(CoreError::not_found("x"))).unwrap_err();
        assert!(err.to_string().starts_with("change could not be saved"));
    }
}
