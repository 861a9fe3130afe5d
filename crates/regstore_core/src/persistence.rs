//! Persistence contract and its JSON implementation.

use crate::config::StoreConfig;
use crate::error::CoreResult;
use crate::ledger::RevisionMap;
use crate::record::Record;
use regstore_storage::{FileBackend, StorageBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// What the record store needs from durable storage.
///
/// Loads happen when the store opens or reloads; saves happen after every
/// successful mutation. A missing or empty source loads as empty.
pub trait Persistence {
    /// Loads all records in submission order.
    fn load_records(&self) -> CoreResult<Vec<Record>>;

    /// Replaces the persisted records.
    fn save_records(&mut self, records: &[Record]) -> CoreResult<()>;

    /// Loads the revision ledger.
    fn load_revisions(&self) -> CoreResult<RevisionMap>;

    /// Replaces the persisted revision ledger.
    fn save_revisions(&mut self, revisions: &RevisionMap) -> CoreResult<()>;
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load_records(&self) -> CoreResult<Vec<Record>> {
        (**self).load_records()
    }

    fn save_records(&mut self, records: &[Record]) -> CoreResult<()> {
        (**self).save_records(records)
    }

    fn load_revisions(&self) -> CoreResult<RevisionMap> {
        (**self).load_revisions()
    }

    fn save_revisions(&mut self, revisions: &RevisionMap) -> CoreResult<()> {
        (**self).save_revisions(revisions)
    }
}

/// JSON snapshots over two storage backends.
///
/// Records are stored as a JSON array, revisions as a JSON object mapping
/// record id to an array of snapshots (oldest first). The layout matches the
/// `applications` / `revisions` files of earlier deployments, so existing
/// data directories open unchanged.
#[derive(Debug)]
pub struct JsonPersistence<B: StorageBackend> {
    records: B,
    revisions: B,
    pretty: bool,
}

impl<B: StorageBackend> JsonPersistence<B> {
    /// Creates a persistence layer over the given backends.
    pub fn new(records: B, revisions: B) -> Self {
        Self {
            records,
            revisions,
            pretty: true,
        }
    }

    /// Sets whether snapshots are pretty-printed.
    #[must_use]
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Returns the records backend.
    pub fn records_backend(&self) -> &B {
        &self.records
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CoreResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

impl JsonPersistence<FileBackend> {
    /// Opens JSON persistence in `dir`, using the file names from `config`.
    ///
    /// The directory is created if missing. Files are created on first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_dir(dir: &Path, config: &StoreConfig) -> CoreResult<Self> {
        let records = FileBackend::open_with_create_dirs(&dir.join(&config.records_file))?;
        let revisions = FileBackend::open_with_create_dirs(&dir.join(&config.revisions_file))?;
        Ok(Self::new(records, revisions).pretty(config.pretty_json))
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(
    backend: &impl StorageBackend,
) -> CoreResult<T> {
    match backend.read_all()? {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
            Ok(serde_json::from_slice(&bytes)?)
        }
        _ => Ok(T::default()),
    }
}

impl<B: StorageBackend> Persistence for JsonPersistence<B> {
    fn load_records(&self) -> CoreResult<Vec<Record>> {
        decode_or_default(&self.records)
    }

    fn save_records(&mut self, records: &[Record]) -> CoreResult<()> {
        let bytes = self.encode(records)?;
        self.records.write_all(&bytes)?;
        Ok(())
    }

    fn load_revisions(&self) -> CoreResult<RevisionMap> {
        decode_or_default(&self.revisions)
    }

    fn save_revisions(&mut self, revisions: &RevisionMap) -> CoreResult<()> {
        let bytes = self.encode(revisions)?;
        self.revisions.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::record::{RecordDraft, Status};
    use regstore_storage::InMemoryBackend;
    use tempfile::tempdir;

    fn record(id: &str, name: &str) -> Record {
        Record::new(id, RecordDraft::new(name, "Jl. Kenanga 3", "JKT"), 1_000)
    }

    #[test]
    fn empty_backends_load_empty() {
        let persistence = JsonPersistence::new(InMemoryBackend::new(), InMemoryBackend::new());
        assert!(persistence.load_records().unwrap().is_empty());
        assert!(persistence.load_revisions().unwrap().is_empty());
    }

    #[test]
    fn blank_snapshot_loads_empty() {
        let persistence = JsonPersistence::new(
            InMemoryBackend::with_data(b"  \n".to_vec()),
            InMemoryBackend::with_data(Vec::new()),
        );
        assert!(persistence.load_records().unwrap().is_empty());
        assert!(persistence.load_revisions().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut persistence =
            JsonPersistence::new(InMemoryBackend::new(), InMemoryBackend::new());
        let records = vec![record("JKT-1", "Ana"), record("JKT-2", "Bo")];
        let mut revisions = RevisionMap::new();
        revisions.insert(
            "JKT-1".into(),
            vec![record("JKT-1", "Ann").with_status(Status::Verified)],
        );

        persistence.save_records(&records).unwrap();
        persistence.save_revisions(&revisions).unwrap();

        assert_eq!(persistence.load_records().unwrap(), records);
        assert_eq!(persistence.load_revisions().unwrap(), revisions);
    }

    #[test]
    fn reads_hand_written_file_layout() {
        let json = br#"[
          {"id":"JKT-1717000000000","name":"Siti","address":"Jl. Melati 5",
           "region":"JKT","submissionTime":1717000000000,"status":"verified"},
          {"id":"BDG-1717000000500","name":"Budi","address":"Jl. Mawar 9",
           "region":"BDG","submissionTime":1717000000500}
        ]"#;
        let persistence = JsonPersistence::new(
            InMemoryBackend::with_data(json.to_vec()),
            InMemoryBackend::with_data(br#"{"JKT-1717000000000":[]}"#.to_vec()),
        );

        let records = persistence.load_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status(), Status::Verified);
        assert_eq!(records[1].status(), Status::Pending);
        assert_eq!(persistence.load_revisions().unwrap()["JKT-1717000000000"].len(), 0);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let persistence = JsonPersistence::new(
            InMemoryBackend::with_data(b"[{".to_vec()),
            InMemoryBackend::new(),
        );
        assert!(matches!(
            persistence.load_records(),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn compact_output() {
        let records_backend = InMemoryBackend::new();
        let mut persistence =
            JsonPersistence::new(records_backend.clone(), InMemoryBackend::new()).pretty(false);
        persistence.save_records(&[record("A-1", "Ana")]).unwrap();

        let text = String::from_utf8(records_backend.data().unwrap()).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.contains("\"submissionTime\":1000"));
    }

    #[test]
    fn closed_backend_surfaces_storage_error() {
        let records_backend = InMemoryBackend::new();
        records_backend.close();
        let mut persistence = JsonPersistence::new(records_backend, InMemoryBackend::new());

        let err = persistence.save_records(&[record("A-1", "Ana")]).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[test]
    fn open_dir_uses_configured_names() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new()
            .records_file("queue.json")
            .revisions_file("history.json");
        let mut persistence = JsonPersistence::open_dir(&dir.path().join("data"), &config).unwrap();

        persistence.save_records(&[record("A-1", "Ana")]).unwrap();
        persistence.save_revisions(&RevisionMap::new()).unwrap();

        assert!(dir.path().join("data/queue.json").exists());
        assert!(dir.path().join("data/history.json").exists());
        assert_eq!(persistence.load_records().unwrap().len(), 1);
    }
}
