//! Script reads.
//!
//! Scripts are read fresh on every call. Lines are 1-indexed for resume
//! purposes and split the way `str::lines` splits them: `\n` or `\r\n`, with
//! no phantom line after a trailing newline.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a script as an ordered list of lines.
///
/// # Errors
///
/// Returns `ScriptRead` if the file cannot be read as UTF-8 text.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(read_whole(path)?.lines().map(str::to_string).collect())
}

/// Read lines `start..=end` of a script joined with `\n`.
///
/// # Errors
///
/// Returns `LineOutOfRange` if `start` is 0 or past the last line, and
/// `ScriptRead` if the file cannot be read.
pub fn read_suffix_from(path: &Path, start: u64) -> Result<String> {
    let lines = read_lines(path)?;
    let total = lines.len() as u64;

    if start == 0 || start > total {
        tracing::error!(
            path = %path.display(),
            start,
            total,
            "Start line exceeds file length, nothing to run"
        );
        return Err(Error::LineOutOfRange {
            path: path.to_path_buf(),
            line: start,
            total,
        });
    }

    let skip = usize::try_from(start - 1).map_err(|_| Error::LineOutOfRange {
        path: path.to_path_buf(),
        line: start,
        total,
    })?;
    Ok(lines[skip..].join("\n"))
}

/// Read a whole script as UTF-8 text.
///
/// # Errors
///
/// Returns `ScriptRead` if the file cannot be read.
pub fn read_whole(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ScriptRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Count the lines of a script.
///
/// # Errors
///
/// Returns `ScriptRead` if the file cannot be read.
pub fn line_count(path: &Path) -> Result<u64> {
    Ok(read_whole(path)?.lines().count() as u64)
}
