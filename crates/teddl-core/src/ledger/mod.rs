//! Download ledger: which (episode URL, variant) pairs were already fetched.
//!
//! In memory the ledger is a single list of paired records. On disk it keeps
//! the historical `download` / `orig` parallel arrays (see [`wire`]), written
//! atomically by [`LedgerStore::persist`]. Entries are append-only.

mod error;
mod store;
mod wire;

pub use error::LedgerError;
pub use store::LedgerStore;

use crate::variant::Variant;
use chrono::{DateTime, Utc};

/// One completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Canonical URL as found in the feed; half of the identity key.
    pub original_url: String,
    /// URL actually fetched. Derivable from the key, kept for auditing.
    pub resolved_url: String,
    pub variant: Variant,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    last_updated: Option<DateTime<Utc>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time of the last append, if any.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// True if `original_url` was already fetched as `variant`.
    pub fn contains(&self, original_url: &str, variant: Variant) -> bool {
        self.entries
            .iter()
            .any(|e| e.variant == variant && e.original_url == original_url)
    }

    /// Returns a copy with the entry added and the timestamp refreshed; `self`
    /// is left untouched so a failed persist can simply be retried.
    ///
    /// Callers check [`Ledger::contains`] first; this does not deduplicate.
    #[must_use]
    pub fn append(&self, original_url: &str, resolved_url: &str, variant: Variant) -> Ledger {
        let mut next = self.clone();
        next.entries.push(LedgerEntry {
            original_url: original_url.to_string(),
            resolved_url: resolved_url.to_string(),
            variant,
        });
        next.last_updated = Some(Utc::now());
        next
    }
}
