//! Single-entry relocation.
//! Attempts one atomic rename into the input spool under the unchanged base name; applies the
//! collision policy before renaming and the cross-device policy when the rename reports EXDEV.

use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{CollisionPolicy, Config, CrossDevicePolicy};
use crate::errors::RecoverError;

use super::atomic::try_atomic_move;
use super::copy::copy_then_remove;
use super::helpers::classify_io;
use super::util::is_cross_device;

/// How a relocation was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMethod {
    Rename,
    Copy,
}

/// A completed (or, in dry-run, planned) move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub method: RelocateMethod,
}

/// Destination path for `src`: `dest_dir` joined with the unmodified base name.
pub fn destination_for(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| anyhow!("Source entry missing a file name: {}", src.display()))?;
    Ok(dest_dir.join(file_name))
}

/// Returns Ok(true) when the caller may proceed, Ok(false) when the entry is to be skipped.
fn check_collision(dest: &Path, policy: CollisionPolicy) -> Result<bool> {
    if fs::symlink_metadata(dest).is_err() {
        return Ok(true);
    }
    match policy {
        CollisionPolicy::Fail => Err(RecoverError::Collision { dest: dest.to_path_buf() }.into()),
        CollisionPolicy::Skip => Ok(false),
        CollisionPolicy::Overwrite => {
            warn!(dest = %dest.display(), "destination exists; overwriting");
            Ok(true)
        }
    }
}

/// Work out what `relocate` would do without touching the filesystem.
/// Returns None when the collision policy would skip the entry.
pub fn plan_relocation(src: &Path, dest_dir: &Path, config: &Config) -> Result<Option<Relocation>> {
    let dest = destination_for(src, dest_dir)?;
    if !check_collision(&dest, config.on_collision)? {
        return Ok(None);
    }
    Ok(Some(Relocation {
        src: src.to_path_buf(),
        dest,
        method: RelocateMethod::Rename,
    }))
}

/// Move `src` into `dest_dir`, keeping its base name.
/// Returns None when the destination exists and the collision policy is `skip`.
pub fn relocate(src: &Path, dest_dir: &Path, config: &Config) -> Result<Option<Relocation>> {
    let dest = destination_for(src, dest_dir)?;
    if !check_collision(&dest, config.on_collision)? {
        info!(src = %src.display(), dest = %dest.display(), "destination exists; skipping");
        return Ok(None);
    }

    match try_atomic_move(src, &dest) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dest.display(), "Renamed message");
            Ok(Some(Relocation {
                src: src.to_path_buf(),
                dest,
                method: RelocateMethod::Rename,
            }))
        }
        Err(e) if is_cross_device(&e) => match config.cross_device {
            CrossDevicePolicy::Fail => Err(RecoverError::CrossDevice {
                src: src.to_path_buf(),
                dest,
            }
            .into()),
            CrossDevicePolicy::Copy => {
                warn!(src = %src.display(), dest = %dest.display(), "rename crosses devices; copying instead");
                let overwrite = config.on_collision == CollisionPolicy::Overwrite;
                let bytes = copy_then_remove(src, &dest, overwrite)?;
                info!(src = %src.display(), dest = %dest.display(), bytes, "Copied message across devices");
                Ok(Some(Relocation {
                    src: src.to_path_buf(),
                    dest,
                    method: RelocateMethod::Copy,
                }))
            }
        },
        Err(e) => Err(classify_io(&format!("move to '{}'", dest.display()), src, e)),
    }
}
