//! Numeric-aware frame directory listing.
//!
//! Frame files are named by their integer millisecond offset, so a plain
//! lexicographic listing interleaves them (`10.jpg` before `7.jpg`).
//! [`ordered_frames`] parses each stem and sorts by the numeric value.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::FrameError;

/// Filesystem artifacts that may appear alongside frame files.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// List the frame files in `directory`, ordered ascending by the integer
/// value of their filename stems.
///
/// Entries on the ignore list of filesystem metadata artifacts are
/// filtered out first. Every remaining filename must have an integer stem;
/// ordering is by that value regardless of string length, so `7.jpg` sorts
/// before `10.jpg`.
///
/// # Errors
///
/// - [`FrameError::Io`] if the directory cannot be read.
/// - [`FrameError::FrameFilename`] if any non-ignored filename does not
///   parse as an integer. Silently dropping it would hand callers an
///   incomplete ordering with no way to notice, so it is a hard error.
///
/// # Example
///
/// ```no_run
/// use frameprep::ordered_frames;
///
/// for path in ordered_frames("data/images/abc_1000")? {
///     println!("{}", path.display());
/// }
/// # Ok::<(), frameprep::FrameError>(())
/// ```
pub fn ordered_frames<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, FrameError> {
    let mut frames: Vec<(u64, PathBuf)> = Vec::new();

    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if IGNORED_FILES.contains(&name) {
            continue;
        }

        let offset_ms = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u64>().ok())
            .ok_or_else(|| FrameError::FrameFilename { path: path.clone() })?;

        frames.push((offset_ms, path));
    }

    frames.sort_by_key(|(offset_ms, _)| *offset_ms);
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}
