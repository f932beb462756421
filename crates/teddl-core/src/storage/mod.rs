//! Download file lifecycle.
//!
//! Bodies are streamed into `<name>.part`, synced, and renamed onto the final
//! name only once the transfer succeeded, so a half-written episode never sits
//! under its real name.

mod writer;

pub use writer::PartFile;

/// Temporary file suffix used before the rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `talk.mp4` → `talk.mp4.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
