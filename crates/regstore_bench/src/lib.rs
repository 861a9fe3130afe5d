//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::seq::SliceRandom;
use rand::Rng;
use regstore_core::{
    CoreResult, JsonPersistence, Persistence, Record, RecordDraft, RecordStore, RevisionMap,
    SequentialIds, StoreConfig,
};
use regstore_storage::InMemoryBackend;

const REGIONS: [&str; 6] = ["JKT", "BDG", "SBY", "MDN", "SMG", "DPS"];

/// Generates `count` drafts with random names, addresses and regions.
///
/// Names are drawn from `count / 4` distinct values so duplicates occur.
pub fn random_drafts(count: usize) -> Vec<RecordDraft> {
    let mut rng = rand::thread_rng();
    let distinct = (count / 4).max(1);
    (0..count)
        .map(|_| {
            let name = format!("Applicant {:06}", rng.gen_range(0..distinct));
            let address = format!("Jl. Raya {}", rng.gen_range(1..1000));
            let region = REGIONS.choose(&mut rng).copied().unwrap_or("JKT");
            RecordDraft::new(name, address, region)
        })
        .collect()
}

/// Generates `count` drafts whose names ascend, the worst insertion order
/// for the name index.
pub fn sorted_drafts(count: usize) -> Vec<RecordDraft> {
    (0..count)
        .map(|i| RecordDraft::new(format!("Applicant {i:08}"), "Jl. Raya 1", "JKT"))
        .collect()
}

/// Persistence that discards every save, so store benchmarks measure the
/// in-memory structures only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPersistence;

impl Persistence for NullPersistence {
    fn load_records(&self) -> CoreResult<Vec<Record>> {
        Ok(Vec::new())
    }

    fn save_records(&mut self, _records: &[Record]) -> CoreResult<()> {
        Ok(())
    }

    fn load_revisions(&self) -> CoreResult<RevisionMap> {
        Ok(RevisionMap::new())
    }

    fn save_revisions(&mut self, _revisions: &RevisionMap) -> CoreResult<()> {
        Ok(())
    }
}

/// Opens an empty store without persistence and with coherence checks off,
/// as in release use.
pub fn bench_store() -> RecordStore {
    RecordStore::builder(NullPersistence)
        .config(StoreConfig::new().check_coherence(false))
        .ids(SequentialIds::default())
        .open()
        .unwrap()
}

/// Opens a store holding `drafts` and returns it with the assigned ids.
pub fn populated_store(drafts: &[RecordDraft]) -> (RecordStore, Vec<String>) {
    let mut store = bench_store();
    let ids = drafts
        .iter()
        .map(|draft| store.submit(draft.clone()).unwrap().into_value())
        .collect();
    (store, ids)
}

/// JSON persistence over fresh in-memory backends.
pub fn memory_persistence(pretty: bool) -> JsonPersistence<InMemoryBackend> {
    JsonPersistence::new(InMemoryBackend::new(), InMemoryBackend::new()).pretty(pretty)
}
