//! Config validation logic.
//! Verifies spool existence, readability/writability, distinct paths and a usable pattern.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::RecoverError;
use crate::fs_ops::io_error_with_help;

use super::types::Config;

impl Config {
    /// Validate both spools and the pattern before any entry is touched.
    ///
    /// Neither spool is created here: a missing directory is a `NotFound` error.
    pub fn validate(&self) -> Result<()> {
        let out = &self.out_spool_dir;
        let spool = &self.spool_dir;

        // 1) Output spool: must exist, be a directory, and be listable.
        ensure_dir(out)?;
        fs::read_dir(out).map_err(io_error_with_help("list output spool", out))?;
        debug!("out_spool_dir readable: {}", out.display());

        // 2) Input spool: must exist, be a directory, and be writable.
        ensure_dir(spool)?;
        if !self.dry_run {
            is_writable_probe(spool).map_err(io_error_with_help("write to input spool", spool))?;
            debug!("spool_dir writable: {}", spool.display());
        }

        // 3) Both must be distinct after resolving symlinks.
        let out_real = dunce::canonicalize(out).unwrap_or_else(|_| out.clone());
        let spool_real = dunce::canonicalize(spool).unwrap_or_else(|_| spool.clone());
        if out_real == spool_real {
            return Err(RecoverError::SameDirectory { path: out_real }.into());
        }

        // 4) Pattern must be a single-component glob.
        if self.pattern.is_empty() || self.pattern.contains('/') || self.pattern.contains('\\') {
            bail!(
                "pattern must match a file name, not a path: '{}'",
                self.pattern
            );
        }
        glob::Pattern::new(&self.pattern)
            .with_context(|| format!("invalid glob pattern '{}'", self.pattern))?;

        info!(
            "Config validated: spool='{}' out_spool='{}' pattern='{}'",
            spool.display(),
            out.display(),
            self.pattern
        );
        Ok(())
    }
}

/// Ensure path exists and is a directory; emit typed errors with path context.
fn ensure_dir(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(io_error_with_help("stat spool directory", path))?;
    if !meta.is_dir() {
        return Err(RecoverError::NotADirectory { path: path.to_path_buf() }.into());
    }
    Ok(())
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files; the name never matches a message glob.
fn is_writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".spool_recover_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
