//! Ledger load/persist errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// File exists but is not a ledger we can trust.
    #[error("ledger {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    /// Reading, creating the directory, writing or renaming failed.
    #[error("ledger {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}
