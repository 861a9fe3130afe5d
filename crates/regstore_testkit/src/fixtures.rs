//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use regstore_core::{
    IdGenerator, JsonPersistence, ManualClock, Record, RecordDraft, RecordStore, SequentialIds,
    StoreConfig,
};
use regstore_storage::InMemoryBackend;
use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

/// Submission time of the first record in every fixture: 2024-06-01T00:00:00Z.
pub const START_MILLIS: u64 = 1_717_200_000_000;

/// A test store over shared in-memory backends.
///
/// The backend handles share state with the ones the store writes to, so a
/// test can inspect saved snapshots, inject save failures with
/// [`InMemoryBackend::close`], or [`reopen`](Self::reopen) the same data.
pub struct TestStore {
    /// The store instance.
    pub store: RecordStore,
    /// Handle to the records snapshot.
    pub records: InMemoryBackend,
    /// Handle to the revisions snapshot.
    pub revisions: InMemoryBackend,
    /// The store's clock.
    pub clock: Rc<ManualClock>,
}

impl TestStore {
    /// Creates an empty store with sequential ids and a manual clock.
    pub fn memory() -> Self {
        Self::with_ids(SequentialIds::default())
    }

    /// Creates an empty store using `ids` for new records.
    pub fn with_ids(ids: impl IdGenerator + 'static) -> Self {
        let records = InMemoryBackend::new();
        let revisions = InMemoryBackend::new();
        let clock = Rc::new(ManualClock::new(START_MILLIS));
        let store = open_over(&records, &revisions, ids, Rc::clone(&clock));
        Self {
            store,
            records,
            revisions,
            clock,
        }
    }

    /// Opens a second store over the same saved snapshots.
    pub fn reopen(&self) -> RecordStore {
        open_over(
            &self.records,
            &self.revisions,
            SequentialIds::starting_at(1_000_000),
            Rc::clone(&self.clock),
        )
    }

    /// Submits a record and returns its id, panicking on failure.
    pub fn submit_named(&mut self, name: &str, region: &str) -> String {
        self.store
            .submit(draft(name, region))
            .expect("Failed to submit record")
            .into_value()
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

fn open_over(
    records: &InMemoryBackend,
    revisions: &InMemoryBackend,
    ids: impl IdGenerator + 'static,
    clock: Rc<ManualClock>,
) -> RecordStore {
    RecordStore::builder(JsonPersistence::new(records.clone(), revisions.clone()))
        .config(StoreConfig::new().check_coherence(true))
        .ids(ids)
        .clock(clock)
        .open()
        .expect("Failed to open test store")
}

/// A file-backed test store in a temporary directory.
pub struct FileTestStore {
    /// The store instance.
    pub store: RecordStore,
    /// The temporary directory (kept alive to prevent cleanup).
    dir: TempDir,
}

impl FileTestStore {
    /// Creates an empty store in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = open_dir(dir.path());
        Self { store, dir }
    }

    /// Returns the data directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Opens a second store over the same directory.
    pub fn reopen(&self) -> RecordStore {
        open_dir(self.dir.path())
    }
}

impl Default for FileTestStore {
    fn default() -> Self {
        Self::new()
    }
}

fn open_dir(dir: &Path) -> RecordStore {
    let config = StoreConfig::new().check_coherence(true);
    let persistence =
        JsonPersistence::open_dir(dir, &config).expect("Failed to open JSON persistence");
    RecordStore::builder(persistence)
        .config(config)
        .ids(SequentialIds::default())
        .open()
        .expect("Failed to open file store")
}

/// Runs a test with a temporary file-backed store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut RecordStore, &Path) -> R,
{
    let mut test_store = FileTestStore::new();
    let path = test_store.dir.path().to_path_buf();
    f(&mut test_store.store, &path)
}

/// Id generator that returns a fixed script of ids, then falls back to
/// sequential ids.
///
/// Used to force collisions and to control tie-breaking among duplicate
/// names.
#[derive(Debug, Default)]
pub struct ScriptedIds {
    script: VecDeque<String>,
    fallback: SequentialIds,
}

impl ScriptedIds {
    /// Creates a generator that yields `ids` in order.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: ids.into_iter().map(Into::into).collect(),
            fallback: SequentialIds::default(),
        }
    }

    /// Returns how many scripted ids are left.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl IdGenerator for ScriptedIds {
    fn next(&mut self, region: &str) -> String {
        self.script
            .pop_front()
            .unwrap_or_else(|| self.fallback.next(region))
    }
}

/// Builds a draft with a derived address.
pub fn draft(name: &str, region: &str) -> RecordDraft {
    RecordDraft::new(name, format!("Jl. {name} 1"), region)
}

/// Asserts that insertion order, id lookup and name order hold the same
/// records, and that the store's own coherence check passes.
pub fn assert_views_agree(store: &RecordStore) {
    let by_insertion: BTreeSet<&str> = store.list_by_insertion_order().map(Record::id).collect();
    let by_name: BTreeSet<&str> = store.list_by_name().map(Record::id).collect();

    assert_eq!(by_insertion.len(), store.len(), "duplicate ids in insertion order");
    assert_eq!(by_insertion, by_name, "name order disagrees with insertion order");
    for id in &by_insertion {
        assert!(store.get(id).is_some(), "id lookup misses {id}");
    }
    store
        .check_coherence()
        .expect("store coherence check failed");
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Applicant names used by populated stores. Contains repeats on purpose.
    pub const NAMES: [&str; 8] = [
        "Siti", "Budi", "Ana", "Dewi", "Ana", "Eka", "Budi", "Rudi",
    ];

    /// Regions used by populated stores.
    pub const REGIONS: [&str; 4] = ["JKT", "BDG", "SBY", "MDN"];

    /// Creates a store with `count` records, one minute apart.
    pub fn populated_store(count: usize) -> TestStore {
        let mut test_store = TestStore::memory();
        for i in 0..count {
            let name = NAMES[i % NAMES.len()];
            let region = REGIONS[i % REGIONS.len()];
            test_store.submit_named(name, region);
            test_store.clock.advance(60_000);
        }
        test_store
    }

    /// Creates a store where every record has been edited `depth` times.
    pub fn store_with_history(count: usize, depth: usize) -> TestStore {
        let mut test_store = populated_store(count);
        let ids: Vec<String> = test_store
            .list_by_insertion_order()
            .map(|r| r.id().to_owned())
            .collect();
        for id in &ids {
            for round in 0..depth {
                let current = test_store.get(id).expect("record exists").clone();
                let renamed = format!("{} {}", current.name(), round + 1);
                test_store
                    .edit(id, draft(&renamed, current.region()))
                    .expect("Failed to edit record");
            }
        }
        test_store
    }
}
