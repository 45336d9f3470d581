//! Windows implementations of platform helpers.
//! Windows lacks POSIX mode semantics; no ACL management is attempted here.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
