//! Advisory spool lock.
//! Uses a sidecar lock file so only one recovery run operates on an output spool at a time.
//!
//! Design:
//! - We lock by opening/holding `.spool_recover.lock` inside the output spool.
//! - `fs2` provides flock(LOCK_EX|LOCK_NB) on Unix and LockFileEx on Windows.
//! - Acquisition never blocks: a contended lock is reported as `RecoverError::Locked`.
//!
//! Notes:
//! - The guard removes the sidecar while still holding the lock, then unlocks.
//! - A waiter may lock an inode that was unlinked in the meantime, so after locking we
//!   check the path still names the locked file and retry with a fresh open if not.
//! - The scanner skips the sidecar name so a broad pattern such as `*` never moves it.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::RecoverError;

use super::helpers::io_error_with_help;

/// File name of the sidecar lock inside the output spool.
pub const LOCK_FILE_NAME: &str = ".spool_recover.lock";

/// RAII guard held while the spool lock is active.
#[derive(Debug)]
pub struct SpoolLock {
    file: File,
    path: PathBuf,
}

impl SpoolLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpoolLock {
    fn drop(&mut self) {
        // unlink before unlock: a run that locks after us must not find our inode at the path
        let _ = std::fs::remove_file(&self.path);
        let _ = FileExt::unlock(&self.file);
        trace!(path = %self.path.display(), "spool lock released");
    }
}

fn lock_file_path(dir: &Path) -> PathBuf {
    dir.join(LOCK_FILE_NAME)
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Opens (or recreates) the sidecar several times at most before giving up as contended.
const MAX_LOCK_ATTEMPTS: usize = 8;

/// Whether `path` still names the file behind `file`.
#[cfg(unix)]
fn is_current_lock_file(file: &File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match std::fs::metadata(path) {
        Ok(on_disk) => Ok(on_disk.dev() == held.dev() && on_disk.ino() == held.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
fn is_current_lock_file(_file: &File, path: &Path) -> io::Result<bool> {
    Ok(path.exists())
}

/// Try to take the spool lock for `dir` without blocking.
/// Returns Ok(None) if another process holds it.
pub fn try_acquire_spool_lock(dir: &Path) -> io::Result<Option<SpoolLock>> {
    let path = lock_file_path(dir);
    for _ in 0..MAX_LOCK_ATTEMPTS {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if is_contended(&e) => {
                trace!(path = %path.display(), "spool lock would block");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        if is_current_lock_file(&file, &path)? {
            trace!(path = %path.display(), "spool lock acquired");
            return Ok(Some(SpoolLock { file, path }));
        }
        // previous holder unlinked the sidecar after we opened it; dropping `file` unlocks
        trace!(path = %path.display(), "locked a stale sidecar; reopening");
    }
    Ok(None)
}

/// Take the spool lock for `dir` or fail with `RecoverError::Locked`.
pub fn acquire_spool_lock(dir: &Path) -> anyhow::Result<SpoolLock> {
    match try_acquire_spool_lock(dir) {
        Ok(Some(lock)) => Ok(lock),
        Ok(None) => Err(RecoverError::Locked { path: lock_file_path(dir) }.into()),
        Err(e) => Err(io_error_with_help("open spool lock", &lock_file_path(dir))(e)),
    }
}
