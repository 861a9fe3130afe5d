//! Store configuration.

/// Configuration for opening a record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Whether submit and edit reject blank name, address or region.
    pub require_fields: bool,

    /// Whether to run a full coherence check of the log and both indexes
    /// after every mutation. Costs O(n) per mutation.
    pub check_coherence: bool,

    /// File name of the records snapshot inside a data directory.
    pub records_file: String,

    /// File name of the revisions snapshot inside a data directory.
    pub revisions_file: String,

    /// Whether snapshots are written as indented JSON.
    pub pretty_json: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            require_fields: true,
            check_coherence: cfg!(debug_assertions),
            records_file: "applications.json".to_string(),
            revisions_file: "revisions.json".to_string(),
            pretty_json: true,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether blank fields are rejected.
    #[must_use]
    pub const fn require_fields(mut self, value: bool) -> Self {
        self.require_fields = value;
        self
    }

    /// Sets whether coherence is checked after every mutation.
    #[must_use]
    pub const fn check_coherence(mut self, value: bool) -> Self {
        self.check_coherence = value;
        self
    }

    /// Sets the records snapshot file name.
    #[must_use]
    pub fn records_file(mut self, name: impl Into<String>) -> Self {
        self.records_file = name.into();
        self
    }

    /// Sets the revisions snapshot file name.
    #[must_use]
    pub fn revisions_file(mut self, name: impl Into<String>) -> Self {
        self.revisions_file = name.into();
        self
    }

    /// Sets whether snapshots are pretty-printed.
    #[must_use]
    pub const fn pretty_json(mut self, value: bool) -> Self {
        self.pretty_json = value;
        self
    }
}
