//! Terminal failure log
//!
//! Records the pages that still failed after every retry. Entries are written
//! once and never changed.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A page that could not be fetched within its retry budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// The URL that failed
    pub url: String,

    /// Description of the last error
    pub error: String,

    /// Total attempts made, including the first
    pub attempts: u32,

    /// Depth the URL was admitted at
    pub depth: u32,
}

/// Append-only map of terminal failures keyed by URL
#[derive(Debug, Default)]
pub struct FailureLog {
    records: Mutex<BTreeMap<String, FailureRecord>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` unless its URL already has one
    ///
    /// Returns true if the record was stored.
    pub fn record(&self, record: FailureRecord) -> bool {
        let mut records = self.lock();
        if records.contains_key(&record.url) {
            return false;
        }
        records.insert(record.url.clone(), record);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every record, ordered by URL
    pub fn snapshot(&self) -> BTreeMap<String, FailureRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, FailureRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
