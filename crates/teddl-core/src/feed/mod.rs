//! Feed retrieval and parsing.
//!
//! The whole document is fetched and parsed eagerly; entries keep document
//! order. The address may be an `http(s)://` URL, a `file://` URL or a plain
//! local path (handy for offline runs).

mod error;
mod parse;

pub use error::FeedError;
pub use parse::parse_feed;

use crate::http::{self, HttpOptions};
use std::path::{Path, PathBuf};

/// One episode as published in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Canonical enclosure URL, treated as an opaque identifier.
    pub url: String,
    pub title: Option<String>,
}

impl FeedEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }
}

/// Fetches the feed at `address` and returns its entries.
pub fn fetch_and_parse(address: &str, http: &HttpOptions) -> Result<Vec<FeedEntry>, FeedError> {
    let bytes = fetch_feed_bytes(address, http)?;
    tracing::debug!(address, bytes = bytes.len(), "fetched feed");
    parse_feed(&bytes)
}

/// Raw feed document from a URL or a local file.
pub fn fetch_feed_bytes(address: &str, http: &HttpOptions) -> Result<Vec<u8>, FeedError> {
    match local_path(address) {
        Some(path) => std::fs::read(&path).map_err(|source| FeedError::Io { path, source }),
        None => fetch_http(address, http),
    }
}

/// `Some(path)` unless the address is an http(s) URL.
fn local_path(address: &str) -> Option<PathBuf> {
    match url::Url::parse(address) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => None,
        Ok(u) if u.scheme() == "file" => u.to_file_path().ok(),
        _ => Some(Path::new(address).to_path_buf()),
    }
}

fn fetch_http(address: &str, http: &HttpOptions) -> Result<Vec<u8>, FeedError> {
    let transport = |source| FeedError::Transport {
        address: address.to_string(),
        source,
    };
    let mut body = Vec::new();
    let mut easy = http.easy_for(address).map_err(transport)?;
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(transport)?;
        transfer.perform().map_err(transport)?;
    }

    let code = easy.response_code().map_err(transport)?;
    if !http::is_success(code) {
        return Err(FeedError::Status {
            address: address.to_string(),
            code,
        });
    }
    Ok(body)
}
