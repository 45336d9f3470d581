//! The recovery pass.
//!
//! Validates the two spools, takes the advisory spool lock when there is anything to move,
//! then walks one lazy scan of the output spool and relocates each matching entry into the
//! input spool. The first error aborts the run: entries already moved stay moved and the
//! rest stay where they were, so a re-run picks up exactly the remainder.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::RecoverError;
use crate::fs_ops::{Relocation, SpoolScan, acquire_spool_lock, plan_relocation, relocate};
use crate::shutdown;

/// An entry left in the output spool because its name was already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub src: PathBuf,
    pub dest: PathBuf,
}

/// Outcome of one recovery pass.
#[derive(Debug, Clone, Default)]
pub struct RecoverReport {
    /// Moves performed, or planned when `dry_run` is set
    pub relocations: Vec<Relocation>,
    pub skipped: Vec<Skipped>,
    pub dry_run: bool,
}

impl RecoverReport {
    pub fn is_empty(&self) -> bool {
        self.relocations.is_empty() && self.skipped.is_empty()
    }
}

/// Open a fresh lazy scan of the configured output spool.
pub fn scan(config: &Config) -> Result<SpoolScan> {
    SpoolScan::open(&config.out_spool_dir, &config.pattern)
}

/// Move every entry of the output spool matching `config.pattern` into the input spool.
pub fn recover(config: &Config) -> Result<RecoverReport> {
    config.validate()?;

    let mut report = RecoverReport {
        dry_run: config.dry_run,
        ..Default::default()
    };

    // Nothing matches: leave the output spool untouched, lock sidecar included.
    if scan(config)?.next().is_none() {
        return Ok(finish(report));
    }

    let _lock = if config.lock && !config.dry_run {
        Some(acquire_spool_lock(&config.out_spool_dir)?)
    } else {
        None
    };

    // Fresh listing taken under the lock.
    for entry in scan(config)? {
        if shutdown::is_requested() {
            info!(moved = report.relocations.len(), "stopping early on shutdown request");
            return Err(RecoverError::Interrupted.into());
        }
        let entry = entry?;

        let outcome = if config.dry_run {
            plan_relocation(&entry.path, &config.spool_dir, config)?
        } else {
            relocate(&entry.path, &config.spool_dir, config)?
        };

        match outcome {
            Some(r) => {
                if config.dry_run {
                    info!(src = %r.src.display(), dest = %r.dest.display(), "dry-run: would move");
                }
                report.relocations.push(r);
            }
            None => {
                let dest = config.spool_dir.join(&entry.file_name);
                debug!(src = %entry.path.display(), dest = %dest.display(), "skipped");
                report.skipped.push(Skipped {
                    src: entry.path,
                    dest,
                });
            }
        }
    }

    Ok(finish(report))
}

fn finish(report: RecoverReport) -> RecoverReport {
    info!(
        moved = report.relocations.len(),
        skipped = report.skipped.len(),
        dry_run = report.dry_run,
        "Recovery finished"
    );
    report
}
