//! Cross-device fallback: copy, rename into place, then remove the source.
//!
//! - Copies to a hidden temp file in the destination directory (create_new; never clobbers).
//! - Fsyncs the temp file, carries permissions and mtime over, then renames it to the final
//!   name within the same directory, so readers of the input spool never see a partial file.
//! - Removes the source only after the destination is in place.
//!
//! Snapshot semantics: the source is read once to EOF; a byte count mismatch against the
//! pre-copy length is treated as a concurrent writer and aborts the copy.

use anyhow::{Context, Result, anyhow, bail};
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::errors::RecoverError;

use super::helpers::io_error_with_help;
use super::util;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst` with buffered I/O, then fsync the destination.
/// Returns the number of bytes written.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}

/// Apply the source's permissions and mtime to `dst` (best-effort on the timestamps).
fn carry_metadata(meta: &fs::Metadata, dst: &Path) -> io::Result<()> {
    fs::set_permissions(dst, meta.permissions())?;
    let mtime = FileTime::from_last_modification_time(meta);
    let atime = FileTime::from_last_access_time(meta);
    if let Err(e) = filetime::set_file_times(dst, atime, mtime) {
        debug!(error = %e, path = %dst.display(), "could not carry timestamps");
    }
    Ok(())
}

/// Relocate `src` to `dest` on another filesystem.
///
/// When `overwrite` is false an existing `dest` is reported as a collision and the temp
/// file is discarded; the source is left untouched.
pub(super) fn copy_then_remove(src: &Path, dest: &Path, overwrite: bool) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat source", src))?;
    if !meta.file_type().is_file() {
        bail!(
            "cannot copy non-regular file across devices: {}",
            src.display()
        );
    }

    let tmp = util::unique_temp_path(dest_dir);
    let finish = || -> Result<u64> {
        let bytes = copy_streaming(src, &tmp)
            .map_err(io_error_with_help("copy to temporary file", &tmp))?;
        if bytes != meta.len() {
            bail!(
                "source changed during copy: {} (expected {} bytes, copied {})",
                src.display(),
                meta.len(),
                bytes
            );
        }
        carry_metadata(&meta, &tmp).map_err(io_error_with_help("set permissions", &tmp))?;

        if !overwrite && fs::symlink_metadata(dest).is_ok() {
            return Err(RecoverError::Collision { dest: dest.to_path_buf() }.into());
        }
        fs::rename(&tmp, dest).map_err(io_error_with_help("rename temporary file", dest))?;
        Ok(bytes)
    };

    let bytes = match finish() {
        Ok(b) => b,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
    };
    let _ = util::fsync_dir(dest_dir);

    fs::remove_file(src)
        .map_err(io_error_with_help("remove source after copy", src))
        .with_context(|| format!("'{}' was copied to '{}'", src.display(), dest.display()))?;
    Ok(bytes)
}
