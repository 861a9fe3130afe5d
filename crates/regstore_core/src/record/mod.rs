//! Record types.
//!
//! A [`Record`] is one identity-card application. Records are owned by the
//! store's ordered log; callers only ever see shared references or clones.

mod status;

pub use status::Status;

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// A single application record.
///
/// The `id` is assigned once at submission and never changes. `name` is the
/// secondary index key and may change on edit or undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    region: String,
    /// Submission time in Unix epoch milliseconds.
    #[serde(rename = "submissionTime", default)]
    submitted_at: u64,
    #[serde(default)]
    status: Status,
}

impl Record {
    /// Creates a pending record from a draft.
    #[must_use]
    pub fn new(id: impl Into<String>, draft: RecordDraft, submitted_at: u64) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            address: draft.address,
            region: draft.region,
            submitted_at,
            status: Status::Pending,
        }
    }

    /// Returns this record with a different status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns the record id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the applicant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the applicant address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the submission time in Unix epoch milliseconds.
    #[must_use]
    pub fn submitted_at(&self) -> u64 {
        self.submitted_at
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the mutable fields as a draft.
    #[must_use]
    pub fn draft(&self) -> RecordDraft {
        RecordDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            region: self.region.clone(),
        }
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Applies edited fields and marks the record as a revision.
    pub(crate) fn apply_edit(&mut self, draft: RecordDraft) {
        self.name = draft.name;
        self.address = draft.address;
        self.region = draft.region;
        self.status = Status::Revision;
    }

    /// Overwrites every field except the id with the snapshot's.
    pub(crate) fn restore_from(&mut self, snapshot: Record) {
        debug_assert_eq!(self.id, snapshot.id);
        self.name = snapshot.name;
        self.address = snapshot.address;
        self.region = snapshot.region;
        self.submitted_at = snapshot.submitted_at;
        self.status = snapshot.status;
    }
}

/// User-supplied fields for submitting or editing a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Applicant name.
    pub name: String,
    /// Applicant address.
    pub address: String,
    /// Region the application belongs to.
    pub region: String,
}

impl RecordDraft {
    /// Creates a draft.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            region: region.into(),
        }
    }

    /// Checks that every field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] naming the first blank field.
    pub fn validate(&self) -> CoreResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("address", &self.address),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidInput { field });
            }
        }
        Ok(())
    }
}
