//! Lazy enumeration of message entries in the output spool.
//!
//! A `SpoolScan` wraps one `read_dir` listing and yields the entries whose names match the
//! configured glob, one at a time. It is built fresh per invocation and never cached, so a
//! second scan observes the directory as it is then. Order is whatever the filesystem returns.
//! Any entry type is yielded, directories included: a matching name is a message to recover.

use anyhow::Result;
use glob::{MatchOptions, Pattern};
use std::ffi::OsString;
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::helpers::io_error_with_help;
use super::lock::LOCK_FILE_NAME;

/// Matching is case-sensitive and lets `*` match a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One matched entry of the output spool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolEntry {
    /// Full path inside the output spool
    pub path: PathBuf,
    /// Base name, reused unmodified as the destination name
    pub file_name: OsString,
}

/// Finite, lazy iterator over matching entries of one directory listing.
#[derive(Debug)]
pub struct SpoolScan {
    dir: PathBuf,
    pattern: Pattern,
    entries: ReadDir,
}

impl SpoolScan {
    /// Open `dir` for scanning. Fails with `RecoverError::NotFound` if the directory is absent.
    pub fn open(dir: &Path, pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern)?;
        let entries = fs::read_dir(dir).map_err(io_error_with_help("list output spool", dir))?;
        debug!(dir = %dir.display(), pattern = %pattern, "scanning spool");
        Ok(Self {
            dir: dir.to_path_buf(),
            pattern,
            entries,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Iterator for SpoolScan {
    type Item = Result<SpoolEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(e) => e,
                Err(e) => return Some(Err(io_error_with_help("read spool entry", &self.dir)(e))),
            };
            let file_name = entry.file_name();
            // Invalid UTF-8 sequences become U+FFFD, which wildcards match like any other
            // character; the entry itself is still moved by its raw name.
            let name = file_name.to_string_lossy();
            if name == LOCK_FILE_NAME || !self.pattern.matches_with(&name, MATCH_OPTIONS) {
                continue;
            }

            let path = entry.path();
            debug!(path = %path.display(), "matched");
            return Some(Ok(SpoolEntry { path, file_name }));
        }
    }
}
