//! File collection for code2html
//!
//! Turns candidate paths into renderable [`FileEntry`] values, filtering
//! out anything the composer must never see: directories, oversize files,
//! binary content, and text that is not valid UTF-8. Skips are counted and
//! reported to the user, never surfaced as errors. Also builds the
//! line-range entry used to render a slice of a file with matching line
//! numbers.

use crate::error::{Error, Result};
use crate::html::FileEntry;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Filtering Limits
// ─────────────────────────────────────────────────────────────────────────────

/// Files larger than this are skipped.
pub const MAX_FILE_SIZE: u64 = 1_000_000;

/// Length of the leading sample inspected for binary content.
pub const BINARY_SAMPLE_LEN: usize = 8192;

// ─────────────────────────────────────────────────────────────────────────────
// Collection
// ─────────────────────────────────────────────────────────────────────────────

/// Read every candidate path into a file entry, in input order.
///
/// Returns the surviving entries and the number of skipped paths. A path is
/// skipped when it is not a regular file, cannot be read, exceeds
/// [`MAX_FILE_SIZE`], contains a NUL byte in its leading
/// [`BINARY_SAMPLE_LEN`] bytes, or is not valid UTF-8.
pub fn collect_file_entries(paths: &[PathBuf]) -> (Vec<FileEntry>, usize) {
    let mut entries = Vec::new();
    let mut skipped = 0;

    for path in paths {
        match read_entry(path) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    (entries, skipped)
}

fn read_entry(path: &Path) -> Option<FileEntry> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            debug!("Skipping '{}': {}", path.display(), err);
            return None;
        }
    };

    if !metadata.is_file() {
        debug!("Skipping '{}': not a regular file", path.display());
        return None;
    }
    if metadata.len() > MAX_FILE_SIZE {
        debug!(
            "Skipping '{}': {} bytes exceeds the {} byte limit",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(err) => {
            debug!("Skipping '{}': {}", path.display(), err);
            return None;
        }
    };

    let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_LEN)];
    if sample.contains(&0) {
        debug!("Skipping '{}': binary content", path.display());
        return None;
    }

    match String::from_utf8(bytes) {
        Ok(content) => Some(FileEntry::new(path, content)),
        Err(_) => {
            debug!("Skipping '{}': not valid UTF-8", path.display());
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// Build an entry for an inclusive 1-based line range of one file, numbered
/// from the range's first line.
///
/// `start` must be at least 1, not past the end of the file, and not after
/// `end`; `end` past the last line is clamped.
pub fn read_line_range(path: &Path, start: u32, end: u32) -> Result<FileEntry> {
    if start < 1 {
        return Err(Error::InvalidLineRange(
            "line numbers start at 1".to_string(),
        ));
    }
    if start > end {
        return Err(Error::InvalidLineRange(format!(
            "start line {} is after end line {}",
            start, end
        )));
    }

    let text = fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().collect();

    if start as usize > lines.len() {
        return Err(Error::InvalidLineRange(format!(
            "start line {} is past the end of the file ({} lines)",
            start,
            lines.len()
        )));
    }

    let end = (end as usize).min(lines.len());
    let content = lines[start as usize - 1..end].join("\n");

    Ok(FileEntry::new(path, content).with_start_line(start))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
