//! Load and persist the ledger file (JSON under the XDG config dir).

use super::{wire, Ledger, LedgerError};
use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ledger file name inside the config directory.
pub const LEDGER_FILE: &str = "downloaded.json";

/// Owns the location of the ledger file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Store backed by `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.config/teddl/downloaded.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("teddl")?;
        Ok(xdg_dirs.get_config_home().join("teddl").join(LEDGER_FILE))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger. A missing file is an empty ledger; unreadable or
    /// malformed content is an error, never silently treated as empty.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no ledger yet, starting empty");
                return Ok(Ledger::new());
            }
            Err(source) => {
                return Err(LedgerError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let ledger = wire::decode(&bytes).map_err(|reason| LedgerError::Corrupt {
            path: self.path.clone(),
            reason,
        })?;
        tracing::debug!(path = %self.path.display(), entries = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    /// Write the whole ledger, creating the directory if needed.
    ///
    /// The JSON goes to a temp file in the same directory, is fsynced, then
    /// renamed over the old file and the directory is fsynced; readers see
    /// either the old or the new ledger.
    pub fn persist(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let json = wire::encode(ledger)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".downloaded")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(io_error(dir))?;
        tmp.write_all(&json).map_err(io_error(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_error(tmp.path()))?;
        tmp.persist(&self.path).map_err(|e| LedgerError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        sync_dir(dir).map_err(io_error(dir))?;

        tracing::debug!(path = %self.path.display(), entries = ledger.len(), "persisted ledger");
        Ok(())
    }
}

/// Make the rename itself durable.
pub(super) fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LedgerError {
    let path = path.to_path_buf();
    move |source| LedgerError::Io { path, source }
}
