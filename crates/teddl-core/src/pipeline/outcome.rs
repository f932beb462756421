//! Terminal per-entry outcomes and the run summary.

use crate::feed::FeedEntry;
use crate::fetcher::FetchError;
use crate::ledger::LedgerError;
use crate::variant::UnknownVariant;
use std::path::PathBuf;

/// Where an entry ended up.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Already in the ledger; no network access was made.
    Skipped { resolved_url: String },
    /// Dry run: would have been fetched to `destination`.
    WouldFetch {
        resolved_url: String,
        destination: PathBuf,
    },
    /// Fetched, verified and durably recorded.
    Recorded {
        resolved_url: String,
        destination: PathBuf,
        bytes: u64,
    },
    Failed(EntryFailure),
}

/// Why an entry failed. Only that entry is affected.
#[derive(Debug, thiserror::Error)]
pub enum EntryFailure {
    #[error("resolve: {0}")]
    Resolve(#[from] UnknownVariant),
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    /// The file was downloaded to `destination` but the ledger could not be saved.
    #[error("record (file kept at {}): {error}", destination.display())]
    Record {
        destination: PathBuf,
        #[source]
        error: LedgerError,
    },
}

impl EntryOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, EntryOutcome::Failed(_))
    }

    /// Short state name for logs and the CLI listing.
    pub fn label(&self) -> &'static str {
        match self {
            EntryOutcome::Skipped { .. } => "skipped",
            EntryOutcome::WouldFetch { .. } => "would fetch",
            EntryOutcome::Recorded { .. } => "downloaded",
            EntryOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct EntryReport {
    pub entry: FeedEntry,
    pub outcome: EntryOutcome,
}

/// Everything one run did, in feed order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn recorded(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Recorded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(EntryOutcome::is_failed)
    }

    /// True when no entry failed (an empty feed counts as success).
    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}
