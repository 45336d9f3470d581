//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Every flag is optional; with none given the tool recovers `out_spool/*.message` into `spool/`.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{CollisionPolicy, Config, CrossDevicePolicy, LogLevel};

/// CLI wrapper for the spool_recover library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move queued message files from the output spool back into the input spool"
)]
pub struct Args {
    /// Input spool directory (destination of recovered messages).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub spool: Option<PathBuf>,

    /// Output spool directory (source of recovered messages).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub out_spool: Option<PathBuf>,

    /// Glob matched against entry names in the output spool.
    #[arg(long, value_name = "GLOB", help = "Glob matched against file names (default: *.message)")]
    pub pattern: Option<String>,

    /// Explicit config file; overrides SPOOL_RECOVER_CONFIG and the default location.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// What to do when a message name already exists in the input spool.
    #[arg(long, value_name = "POLICY", help = "On name collision: fail, skip or overwrite")]
    pub on_collision: Option<CollisionPolicy>,

    /// What to do when the spools are on different filesystems.
    #[arg(long, value_name = "POLICY", help = "Across filesystems: copy or fail")]
    pub cross_device: Option<CrossDevicePolicy>,

    /// Disable the advisory spool lock (for NFS/network shares where flock may fail).
    #[arg(long, help = "Disable the advisory lock on the output spool")]
    pub no_lock: bool,

    /// Dry-run: report planned moves but do not modify the filesystem.
    #[arg(long, help = "Show what would be moved, but do not modify files")]
    pub dry_run: bool,

    /// Print the matching entries of the output spool and exit.
    #[arg(long, help = "List matching messages in the output spool and exit")]
    pub list: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Also append logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where spool_recover will look for the config file, then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(p) = &self.spool {
            cfg.spool_dir = p.clone();
        }
        if let Some(p) = &self.out_spool {
            cfg.out_spool_dir = p.clone();
        }
        if let Some(p) = &self.pattern {
            cfg.pattern = p.clone();
        }
        if let Some(p) = self.on_collision {
            cfg.on_collision = p;
        }
        if let Some(p) = self.cross_device {
            cfg.cross_device = p;
        }
        if self.no_lock {
            cfg.lock = false;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
