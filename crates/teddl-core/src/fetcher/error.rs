//! Episode download error type.

use std::path::PathBuf;

/// Why a single episode GET failed. Network and disk causes are kept apart so
/// the report can say which side to look at.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// DNS, connect, TLS, timeout or stalled transfer.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    /// Creating, writing or renaming the local file failed.
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Transfer reported success but the file is missing or empty.
    #[error("verify {}: {reason}", path.display())]
    Verify { path: PathBuf, reason: &'static str },
}

impl FetchError {
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Status { .. })
    }

    pub fn is_disk(&self) -> bool {
        matches!(self, FetchError::Write { .. } | FetchError::Verify { .. })
    }
}
