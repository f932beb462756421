//! Feed-to-file orchestration.
//!
//! Entries are processed strictly one after another:
//!
//! ```text
//! Pending → Resolved → Skipped
//!                    → Fetching → Verified → Recorded
//!                    → Failed (at any step)
//! ```
//!
//! A failed entry never stops the run. The ledger is persisted after every
//! recorded entry, so an interrupted run loses at most the entry in flight.

mod outcome;

pub use outcome::{EntryFailure, EntryOutcome, EntryReport, RunReport};

use crate::feed::{self, FeedEntry, FeedError};
use crate::fetcher::Fetch;
use crate::http::HttpOptions;
use crate::ledger::{Ledger, LedgerError, LedgerStore};
use crate::url_model;
use crate::variant::Variant;
use std::path::PathBuf;

/// Per-run settings, fully resolved by the caller (config file + flags).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Variant tag; an unknown tag fails every entry at the resolve step.
    pub variant: String,
    /// Directory episodes are saved to.
    pub save_dir: PathBuf,
    /// Re-download even when the ledger already has the entry.
    pub force: bool,
    /// Resolve and dedup only; never fetch or record.
    pub dry_run: bool,
    /// Process at most this many entries from the top of the feed.
    pub limit: Option<usize>,
}

impl PipelineConfig {
    pub fn new(variant: impl Into<String>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            variant: variant.into(),
            save_dir: save_dir.into(),
            force: false,
            dry_run: false,
            limit: None,
        }
    }
}

/// Errors that abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    /// The dedup state cannot be trusted; rerun with force to ignore it.
    #[error("{0} (use --force to ignore the ledger)")]
    Ledger(#[from] LedgerError),
}

pub struct Pipeline<F: Fetch> {
    config: PipelineConfig,
    store: LedgerStore,
    fetcher: F,
    ledger: Ledger,
    ledger_warning: Option<LedgerError>,
}

impl<F: Fetch> Pipeline<F> {
    /// Loads the ledger. A load failure is fatal unless `config.force` is set,
    /// in which case the run starts from an empty ledger and
    /// [`Pipeline::ledger_warning`] holds the error.
    pub fn open(config: PipelineConfig, store: LedgerStore, fetcher: F) -> Result<Self, PipelineError> {
        let (ledger, ledger_warning) = match store.load() {
            Ok(ledger) => (ledger, None),
            Err(e) if config.force => {
                tracing::warn!("ignoring unreadable ledger because of --force: {}", e);
                (Ledger::new(), Some(e))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            config,
            store,
            fetcher,
            ledger,
            ledger_warning,
        })
    }

    /// Error that was tolerated while loading the ledger in force mode.
    pub fn ledger_warning(&self) -> Option<&LedgerError> {
        self.ledger_warning.as_ref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch the feed at `address` and process it. Feed errors abort the run.
    pub fn run_feed(&mut self, address: &str, http: &HttpOptions) -> Result<RunReport, PipelineError> {
        let entries = feed::fetch_and_parse(address, http)?;
        tracing::info!(address, entries = entries.len(), "feed loaded");
        Ok(self.run(entries))
    }

    /// Process `entries` in order.
    pub fn run(&mut self, entries: Vec<FeedEntry>) -> RunReport {
        let limit = self.config.limit.unwrap_or(usize::MAX);
        let mut report = RunReport::default();
        for entry in entries.into_iter().take(limit) {
            let outcome = self.process(&entry);
            match &outcome {
                EntryOutcome::Failed(err) => {
                    tracing::warn!(url = %entry.url, "entry failed: {}", err)
                }
                other => tracing::info!(url = %entry.url, state = other.label(), "entry done"),
            }
            report.entries.push(EntryReport { entry, outcome });
        }
        tracing::info!(
            recorded = report.recorded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "run finished"
        );
        report
    }

    fn process(&mut self, entry: &FeedEntry) -> EntryOutcome {
        let variant: Variant = match self.config.variant.parse() {
            Ok(v) => v,
            Err(e) => return EntryOutcome::Failed(EntryFailure::Resolve(e)),
        };
        let resolved_url = variant.resolve(&entry.url);

        let known = self.ledger.contains(&entry.url, variant);
        if known && !self.config.force {
            return EntryOutcome::Skipped { resolved_url };
        }

        let destination = self.config.save_dir.join(url_model::derive_filename(&resolved_url));
        if self.config.dry_run {
            return EntryOutcome::WouldFetch {
                resolved_url,
                destination,
            };
        }

        // Different episodes can share a basename; the later one wins.
        if !known && destination.exists() {
            tracing::warn!(
                url = %resolved_url,
                path = %destination.display(),
                "replacing existing file not recorded for this episode"
            );
        }

        let bytes = match self.fetcher.fetch(&resolved_url, &destination) {
            Ok(bytes) => bytes,
            Err(e) => return EntryOutcome::Failed(e.into()),
        };

        // Forced re-download of a known pair: the ledger already says so.
        if !known {
            let next = self.ledger.append(&entry.url, &resolved_url, variant);
            if let Err(error) = self.store.persist(&next) {
                return EntryOutcome::Failed(EntryFailure::Record { destination, error });
            }
            self.ledger = next;
        }

        EntryOutcome::Recorded {
            resolved_url,
            destination,
            bytes,
        }
    }
}
