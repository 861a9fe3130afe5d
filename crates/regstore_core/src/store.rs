//! Record store facade.

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::ids::{IdGenerator, TimestampIds};
use crate::index::{NameIndex, NameIter, PrimaryIndex};
use crate::ledger::RevisionLedger;
use crate::log::OrderedLog;
use crate::persistence::{JsonPersistence, Persistence};
use crate::record::{Record, RecordDraft, Status};
use crate::stats::{utc_day, OperationCounts, StoreStats};
use crate::types::Locator;
use chrono::NaiveDate;
use regstore_storage::InMemoryBackend;
use std::path::Path;
use std::rc::Rc;

/// Result of a mutating store operation.
///
/// The mutation itself has been applied in memory. `save_error` reports
/// whether writing it to persistence failed; a failed save is not rolled
/// back, the in-memory state stays authoritative.
#[derive(Debug)]
pub struct Mutation<T> {
    value: T,
    save_error: Option<CoreError>,
}

impl<T> Mutation<T> {
    fn new(value: T, save_error: Option<CoreError>) -> Self {
        Self { value, save_error }
    }

    /// Returns the operation's value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the operation's value, discarding the save outcome.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns true if the mutation reached persistence.
    pub fn is_durable(&self) -> bool {
        self.save_error.is_none()
    }

    /// Returns the save error, if the save failed.
    pub fn save_error(&self) -> Option<&CoreError> {
        self.save_error.as_ref()
    }

    /// Splits into the value and the save outcome.
    pub fn into_parts(self) -> (T, Option<CoreError>) {
        (self.value, self.save_error)
    }
}

/// Outcome of [`RecordStore::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The record was moved to `verified`.
    Verified,
    /// The record was already verified; nothing changed and nothing was saved.
    AlreadyVerified,
}

/// Builder for a [`RecordStore`] with non-default collaborators.
pub struct StoreBuilder {
    persistence: Box<dyn Persistence>,
    config: StoreConfig,
    ids: Option<Box<dyn IdGenerator>>,
    clock: Rc<dyn Clock>,
}

impl StoreBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the id generator.
    ///
    /// Without one, the store uses [`TimestampIds`] on its own clock.
    #[must_use]
    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Sets the clock used for submission timestamps.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    /// Opens the store, loading records and revisions from persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the persisted records contain a
    /// duplicate id, or a persisted history holds a snapshot of another
    /// record.
    pub fn open(self) -> CoreResult<RecordStore> {
        let clock = self.clock;
        let ids = self
            .ids
            .unwrap_or_else(|| Box::new(TimestampIds::with_clock(Rc::clone(&clock))));
        let mut store = RecordStore {
            config: self.config,
            persistence: self.persistence,
            ids,
            clock,
            log: OrderedLog::new(),
            primary: PrimaryIndex::new(),
            names: NameIndex::new(),
            ledger: RevisionLedger::new(),
            counts: OperationCounts::default(),
            degraded: false,
        };
        store.load()?;
        tracing::info!(
            records = store.log.len(),
            histories = store.ledger.len(),
            "record store opened"
        );
        Ok(store)
    }
}

/// An in-process store of application records.
///
/// `RecordStore` keeps every record reachable three ways at once:
/// - submission order, through the ordered log that owns the records
/// - unique id, through the primary index
/// - name order, through the name index
///
/// and keeps a per-record undo history. Every mutation goes through this
/// type, which updates all structures together and then saves through its
/// [`Persistence`] collaborator.
///
/// # Opening a Store
///
/// ```rust
/// use regstore_core::{RecordDraft, RecordStore};
///
/// let mut store = RecordStore::open_in_memory().unwrap();
/// let id = store
///     .submit(RecordDraft::new("Ana", "Jl. Merdeka 1", "JKT"))
///     .unwrap()
///     .into_value();
///
/// store.edit(&id, RecordDraft::new("Ana Maria", "Jl. Merdeka 1", "JKT")).unwrap();
/// store.undo(&id).unwrap();
/// assert_eq!(store.get(&id).unwrap().name(), "Ana");
/// ```
pub struct RecordStore {
    config: StoreConfig,
    persistence: Box<dyn Persistence>,
    ids: Box<dyn IdGenerator>,
    clock: Rc<dyn Clock>,
    log: OrderedLog,
    primary: PrimaryIndex,
    names: NameIndex,
    ledger: RevisionLedger,
    counts: OperationCounts,
    degraded: bool,
}

impl RecordStore {
    /// Starts building a store over `persistence`.
    ///
    /// Defaults: [`StoreConfig::default`], [`SystemClock`], and
    /// [`TimestampIds`] reading the store's clock.
    pub fn builder(persistence: impl Persistence + 'static) -> StoreBuilder {
        StoreBuilder {
            persistence: Box::new(persistence),
            config: StoreConfig::default(),
            ids: None,
            clock: Rc::new(SystemClock),
        }
    }

    /// Opens a store over `persistence` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn open(persistence: impl Persistence + 'static) -> CoreResult<Self> {
        Self::builder(persistence).open()
    }

    /// Opens a store backed by JSON files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or loading fails.
    pub fn open_dir(dir: &Path, config: StoreConfig) -> CoreResult<Self> {
        let persistence = JsonPersistence::open_dir(dir, &config)?;
        Self::builder(persistence).config(config).open()
    }

    /// Opens an empty store that persists to memory only.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other openers.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open(JsonPersistence::new(
            InMemoryBackend::new(),
            InMemoryBackend::new(),
        ))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // === Mutations ===

    /// Submits a new record and returns its id.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] if a required field is blank
    /// - [`CoreError::DuplicateKey`] if the id generator returned an id that
    ///   is already in use; the store is left unchanged
    pub fn submit(&mut self, draft: RecordDraft) -> CoreResult<Mutation<String>> {
        if self.config.require_fields {
            draft.validate()?;
        }

        let id = self.ids.next(&draft.region);
        if self.primary.contains(&id) {
            tracing::debug!(id = %id, "generated id collides with an existing record");
            return Err(CoreError::duplicate_key(id));
        }

        let name = draft.name.clone();
        let record = Record::new(id.clone(), draft, self.clock.now_millis());
        let locator = self.log.append(record).map_err(escalate)?;
        self.primary.insert(id.clone(), locator).map_err(escalate)?;
        self.names.insert(&name, &id, locator).map_err(escalate)?;

        self.counts.record_submit();
        tracing::debug!(id = %id, "record submitted");
        self.after_mutation()?;

        let save_error = self.persist(false);
        Ok(Mutation::new(id, save_error))
    }

    /// Marks a record as verified.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if `id` is unknown.
    pub fn verify(&mut self, id: &str) -> CoreResult<Mutation<Verification>> {
        let locator = self.resolve(id)?;
        let record = self.log.get_mut(locator).ok_or_else(|| stale(id))?;

        if record.status() == Status::Verified {
            return Ok(Mutation::new(Verification::AlreadyVerified, None));
        }
        record.set_status(Status::Verified);

        self.counts.record_verify();
        tracing::debug!(id, "record verified");
        self.after_mutation()?;

        let save_error = self.persist(false);
        Ok(Mutation::new(Verification::Verified, save_error))
    }

    /// Replaces a record's fields and marks it as a revision.
    ///
    /// The pre-edit record is pushed onto its undo history. If the name
    /// changes, the record moves in the name index in the same step.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] if a required field is blank
    /// - [`CoreError::NotFound`] if `id` is unknown
    pub fn edit(&mut self, id: &str, draft: RecordDraft) -> CoreResult<Mutation<Record>> {
        if self.config.require_fields {
            draft.validate()?;
        }

        let locator = self.resolve(id)?;
        let record = self.log.get_mut(locator).ok_or_else(|| stale(id))?;

        if record.name() != draft.name {
            self.names
                .rekey(record.name(), id, &draft.name, locator)
                .map_err(escalate)?;
        }
        self.ledger.push(id, record.clone());
        record.apply_edit(draft);
        let updated = record.clone();

        self.counts.record_edit();
        tracing::debug!(id, depth = self.ledger.depth(id), "record edited");
        self.after_mutation()?;

        let save_error = self.persist(true);
        Ok(Mutation::new(updated, save_error))
    }

    /// Restores the record to its state before the most recent edit.
    ///
    /// The record keeps its slot and id; every other field, status
    /// included, comes from the snapshot.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoRevision`] if the record has no undo history
    /// - [`CoreError::NotFound`] if the record no longer exists
    pub fn undo(&mut self, id: &str) -> CoreResult<Mutation<Record>> {
        let snapshot_name = match self.ledger.peek(id) {
            Some(snapshot) if snapshot.id() == id => snapshot.name().to_owned(),
            Some(snapshot) => {
                return Err(escalate(CoreError::invariant(format!(
                    "history of {id} holds a snapshot of {}",
                    snapshot.id()
                ))));
            }
            None => return Err(CoreError::no_revision(id)),
        };

        let locator = self.resolve(id)?;
        let record = self.log.get_mut(locator).ok_or_else(|| stale(id))?;

        if record.name() != snapshot_name {
            self.names
                .rekey(record.name(), id, &snapshot_name, locator)
                .map_err(escalate)?;
        }
        let snapshot = self.ledger.pop(id)?;
        record.restore_from(snapshot);
        let restored = record.clone();

        self.counts.record_undo();
        tracing::debug!(id, remaining = self.ledger.depth(id), "revision undone");
        self.after_mutation()?;

        let save_error = self.persist(true);
        Ok(Mutation::new(restored, save_error))
    }

    /// Discards in-memory state and loads it again from persistence.
    ///
    /// On error the current state is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the persisted records contain a
    /// duplicate id.
    pub fn reload(&mut self) -> CoreResult<()> {
        self.load()?;
        self.degraded = false;
        tracing::info!(
            records = self.log.len(),
            histories = self.ledger.len(),
            "record store reloaded"
        );
        Ok(())
    }

    // === Reads ===

    /// Returns the record with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.primary.lookup(id).and_then(|loc| self.log.get(loc))
    }

    /// Returns true if a record with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.primary.contains(id)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Returns how many edits of `id` can be undone.
    #[must_use]
    pub fn revision_depth(&self, id: &str) -> usize {
        self.ledger.depth(id)
    }

    /// Returns true if `id` has undo history.
    #[must_use]
    pub fn has_history(&self, id: &str) -> bool {
        self.ledger.has_history(id)
    }

    /// Returns true if the last save failed and storage is behind memory.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Iterates records in submission order.
    pub fn list_by_insertion_order(&self) -> impl Iterator<Item = &Record> + '_ {
        self.log.iter()
    }

    /// Iterates records in name order, ties by id.
    ///
    /// The iterator is lazy; call again to restart.
    #[must_use]
    pub fn list_by_name(&self) -> ByName<'_> {
        ByName {
            entries: self.names.iter(),
            log: &self.log,
        }
    }

    /// Returns records sorted by region. Records in the same region keep
    /// submission order. The stored order is not changed.
    #[must_use]
    pub fn list_by_region(&self) -> Vec<&Record> {
        self.log.sorted_by(|a, b| a.region().cmp(b.region()))
    }

    /// Returns records sorted by submission time, oldest first. The stored
    /// order is not changed.
    #[must_use]
    pub fn list_by_submission_time(&self) -> Vec<&Record> {
        self.log.sorted_by(|a, b| a.submitted_at().cmp(&b.submitted_at()))
    }

    /// Returns records whose id or name contains `query`, ignoring case,
    /// in submission order. A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Record> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.log
            .iter()
            .filter(|r| {
                r.id().to_lowercase().contains(&query) || r.name().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Returns records submitted on `day` (UTC), in submission order.
    #[must_use]
    pub fn submitted_on(&self, day: NaiveDate) -> Vec<&Record> {
        self.log
            .iter()
            .filter(|r| utc_day(r.submitted_at()) == Some(day))
            .collect()
    }

    /// Returns current statistics.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats::collect(
            self.log.iter(),
            self.ledger.len(),
            self.ledger.total_snapshots(),
            self.counts,
        )
    }

    /// Verifies that the log, the primary index and the name index refer to
    /// exactly the same records.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvariantViolation`] describing the first
    /// mismatch found.
    pub fn check_coherence(&self) -> CoreResult<()> {
        let records = self.log.len();
        if self.primary.len() != records || self.names.len() != records {
            return Err(CoreError::invariant(format!(
                "view sizes differ: log {records}, primary {}, names {}",
                self.primary.len(),
                self.names.len()
            )));
        }
        for (locator, record) in self.log.entries() {
            if self.primary.lookup(record.id()) != Some(locator) {
                return Err(CoreError::invariant(format!(
                    "primary index does not point {} at {locator}",
                    record.id()
                )));
            }
            if self.names.find(record.name(), record.id()) != Some(locator) {
                return Err(CoreError::invariant(format!(
                    "name index does not hold ({}, {}) at {locator}",
                    record.name(),
                    record.id()
                )));
            }
        }
        Ok(())
    }

    // === Internals ===

    fn resolve(&self, id: &str) -> CoreResult<Locator> {
        self.primary
            .lookup(id)
            .ok_or_else(|| CoreError::not_found(id))
    }

    fn after_mutation(&self) -> CoreResult<()> {
        if self.config.check_coherence {
            self.check_coherence().map_err(escalate)?;
        }
        Ok(())
    }

    /// Saves records, and the ledger if `revisions` is set or an earlier
    /// save failed. Both saves are attempted; the first error is returned.
    fn persist(&mut self, revisions: bool) -> Option<CoreError> {
        let mut first_error = self.persistence.save_records(&self.log.snapshot()).err();
        if revisions || self.degraded {
            if let Err(e) = self.persistence.save_revisions(&self.ledger.to_map()) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => {
                if self.degraded {
                    tracing::info!("persistence caught up with in-memory state");
                }
                self.degraded = false;
                None
            }
            Some(e) => {
                tracing::warn!(error = %e, "save failed, in-memory state is ahead of storage");
                self.degraded = true;
                self.counts.record_failed_save();
                Some(e)
            }
        }
    }

    /// Rebuilds every structure from persistence. Nothing is replaced
    /// unless the whole load succeeds.
    fn load(&mut self) -> CoreResult<()> {
        let records = self.persistence.load_records()?;
        let revisions = self.persistence.load_revisions()?;

        let mut log = OrderedLog::with_generation(self.log.generation().wrapping_add(1));
        let mut primary = PrimaryIndex::new();
        let mut names = NameIndex::new();
        for record in records {
            let id = record.id().to_owned();
            let name = record.name().to_owned();
            if primary.contains(&id) {
                return Err(CoreError::duplicate_key(id));
            }
            let locator = log.append(record)?;
            primary.insert(id.clone(), locator)?;
            names.insert(&name, &id, locator)?;
        }

        let ledger = RevisionLedger::from_map(revisions)?;
        for orphan in ledger.ids().filter(|id| !primary.contains(id)) {
            tracing::warn!(id = %orphan, "revision history for unknown record");
        }

        self.log = log;
        self.primary = primary;
        self.names = names;
        self.ledger = ledger;
        Ok(())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.log.len())
            .field("histories", &self.ledger.len())
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

/// Records in name order. See [`RecordStore::list_by_name`].
#[derive(Debug)]
pub struct ByName<'a> {
    entries: NameIter<'a>,
    log: &'a OrderedLog,
}

impl<'a> Iterator for ByName<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (_, id, locator) = self.entries.next()?;
            match self.log.get(locator) {
                Some(record) => return Some(record),
                None => {
                    escalate(CoreError::invariant(format!(
                        "name index holds stale locator {locator} for {id}"
                    )));
                }
            }
        }
    }
}

/// Logs an internal desync and fails hard in debug builds.
fn escalate(error: CoreError) -> CoreError {
    if let CoreError::InvariantViolation { message } = &error {
        tracing::error!(%message, "record store invariant violated");
        debug_assert!(false, "record store invariant violated: {message}");
    }
    error
}

fn stale(id: &str) -> CoreError {
    escalate(CoreError::invariant(format!(
        "primary index holds a stale locator for {id}"
    )))
}
