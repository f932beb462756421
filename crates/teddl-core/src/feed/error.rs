//! Feed retrieval/parse errors. All of them abort a run.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("fetch feed {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: curl::Error,
    },
    #[error("fetch feed {address}: HTTP {code}")]
    Status { address: String, code: u32 },
    #[error("read feed {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse feed: {0}")]
    Parse(#[from] rss::Error),
}
