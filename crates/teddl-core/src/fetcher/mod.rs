//! Single-stream HTTP GET of one episode into a local file.
//!
//! The body is written to `<destination>.part` and renamed into place after a
//! 2xx response; the final file must exist and be non-empty to count as fetched.
//! Nothing here retries: a failed episode is simply picked up by the next run.

mod error;

pub use error::FetchError;

use crate::http::{self, HttpOptions};
use crate::storage::{self, PartFile};
use std::fs;
use std::path::Path;

/// Seam between the pipeline and the network.
pub trait Fetch {
    /// Download `url` to `destination`, returning the number of bytes written.
    fn fetch(&self, url: &str, destination: &Path) -> Result<u64, FetchError>;
}

/// libcurl-backed [`Fetch`].
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    http: HttpOptions,
}

impl CurlFetcher {
    pub fn new(http: HttpOptions) -> Self {
        Self { http }
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        fetch(url, destination, &self.http)
    }
}

/// Downloads `url` to `destination`, creating parent directories as needed.
///
/// Runs in the current thread and blocks until the transfer ends or one of the
/// [`HttpOptions`] limits trips.
pub fn fetch(url: &str, destination: &Path, http: &HttpOptions) -> Result<u64, FetchError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| FetchError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = storage::temp_path(destination);
    let part = PartFile::create(&temp_path).map_err(|source| FetchError::Write {
        path: temp_path.clone(),
        source,
    })?;

    tracing::debug!(url, path = %destination.display(), "GET");
    let part = match transfer(url, part, http) {
        Ok(part) => part,
        Err((part, err)) => {
            part.discard();
            return Err(err);
        }
    };

    // An empty body must not replace whatever is already at `destination`.
    if part.written() == 0 {
        part.discard();
        return Err(FetchError::Verify {
            path: destination.to_path_buf(),
            reason: EMPTY_BODY,
        });
    }

    let written = part.finalize(destination).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        FetchError::Write {
            path: destination.to_path_buf(),
            source,
        }
    })?;
    verify(destination)?;
    tracing::debug!(url, bytes = written, "GET complete");
    Ok(written)
}

/// Runs the GET, streaming into `part`. On failure the part file is handed back
/// so the caller can discard it.
fn transfer(
    url: &str,
    mut part: PartFile,
    http: &HttpOptions,
) -> Result<PartFile, (PartFile, FetchError)> {
    let transport = |source: curl::Error| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let mut easy = match http.easy_for(url) {
        Ok(easy) => easy,
        Err(e) => return Err((part, transport(e))),
    };

    let mut write_error: Option<std::io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        let registered = transfer.write_function(|data| match part.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        });
        registered.and_then(|()| transfer.perform())
    };

    if let Some(source) = write_error {
        let path = part.temp_path().to_path_buf();
        return Err((part, FetchError::Write { path, source }));
    }
    if let Err(e) = performed {
        return Err((part, transport(e)));
    }

    let code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => return Err((part, transport(e))),
    };
    if !http::is_success(code) {
        return Err((
            part,
            FetchError::Status {
                url: url.to_string(),
                code,
            },
        ));
    }
    Ok(part)
}

const EMPTY_BODY: &str = "downloaded file is empty";

/// The saved file must exist and hold at least one byte.
fn verify(destination: &Path) -> Result<(), FetchError> {
    let reason = match fs::metadata(destination) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => return Ok(()),
        Ok(meta) if meta.is_file() => {
            let _ = fs::remove_file(destination);
            EMPTY_BODY
        }
        Ok(_) => "destination is not a regular file",
        Err(_) => "downloaded file is missing",
    };
    Err(FetchError::Verify {
        path: destination.to_path_buf(),
        reason,
    })
}
