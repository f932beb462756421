//! Tracing setup for the CLI: append to a log file under the XDG state dir,
//! or write to stderr when that file cannot be opened.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Log file name inside `~/.local/state/teddl/`.
pub const LOG_FILE: &str = "teddl.log";

/// Default directives when `RUST_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,teddl=debug,teddl_core=debug"
    } else {
        "info"
    }
}

fn install(verbose: bool, writer: BoxMakeWriter) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}

/// Log to `~/.local/state/teddl/teddl.log`; returns the file path.
///
/// Errors leave no subscriber installed, so the caller can still use
/// [`init_logging_stderr`].
pub fn init_logging(verbose: bool) -> Result<PathBuf> {
    let state_home = xdg::BaseDirectories::with_prefix("teddl")?.get_state_home();
    let path = state_home.join("teddl").join(LOG_FILE);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    // Mutex<File> is a MakeWriter; events are serialized on the lock.
    install(verbose, BoxMakeWriter::new(Mutex::new(file)))?;
    tracing::info!(path = %path.display(), "teddl logging initialized");
    Ok(path)
}

/// Log to stderr only. Never fails; a second init is ignored.
pub fn init_logging_stderr(verbose: bool) {
    let _ = install(verbose, BoxMakeWriter::new(std::io::stderr));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_teddl_crates_to_debug() {
        assert_eq!(default_directives(false), "info");
        let verbose = default_directives(true);
        assert!(verbose.contains("teddl=debug"));
        assert!(verbose.contains("teddl_core=debug"));
        assert!(EnvFilter::try_new(verbose).is_ok());
    }
}
