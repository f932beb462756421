//! Sequential writer for `.part` download files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered, append-only writer for one temp download file.
pub struct PartFile {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) the temp file at `temp_path`.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(PartFile {
            writer: BufWriter::new(file),
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` to the file.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes appended so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, fsync and rename onto `final_path`. Returns the byte count.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> io::Result<u64> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&self.temp_path, final_path)?;
        Ok(self.written)
    }

    /// Drop the handle and remove the temp file; a missing file is not an error.
    pub fn discard(self) {
        let temp_path = self.temp_path;
        drop(self.writer);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %temp_path.display(), "could not remove temp file: {}", e);
            }
        }
    }
}
