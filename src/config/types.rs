//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel and the two move policies carry simple parsing helpers shared by CLI and XML.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{MESSAGE_PATTERN_DEFAULT, OUT_SPOOL_DIR_DEFAULT, SPOOL_DIR_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors; a successful run prints nothing (default)
    #[default]
    Normal,
    /// One line per moved message plus a summary
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What to do when the destination name is already taken in the input spool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Abort the run with a collision error.
    #[default]
    Fail,
    /// Leave the source in the output spool and continue.
    Skip,
    /// Replace the existing destination.
    Overwrite,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionPolicy::Fail => "fail",
            CollisionPolicy::Skip => "skip",
            CollisionPolicy::Overwrite => "overwrite",
        })
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" | "error" => Ok(CollisionPolicy::Fail),
            "skip" => Ok(CollisionPolicy::Skip),
            "overwrite" | "replace" => Ok(CollisionPolicy::Overwrite),
            _ => Err(format!(
                "invalid collision policy: '{s}' (expected fail, skip or overwrite)"
            )),
        }
    }
}

/// What to do when the two spools live on different filesystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossDevicePolicy {
    /// Copy to a temp file in the input spool, rename it into place, then remove the source.
    #[default]
    Copy,
    /// Abort the run with a cross-device error.
    Fail,
}

impl fmt::Display for CrossDevicePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CrossDevicePolicy::Copy => "copy",
            CrossDevicePolicy::Fail => "fail",
        })
    }
}

impl FromStr for CrossDevicePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(CrossDevicePolicy::Copy),
            "fail" | "error" => Ok(CrossDevicePolicy::Fail),
            _ => Err(format!(
                "invalid cross-device policy: '{s}' (expected copy or fail)"
            )),
        }
    }
}

/// Runtime configuration used by the recoverer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input spool: where recovered messages are moved to
    pub spool_dir: PathBuf,
    /// Output spool: where claimed-but-unprocessed messages are recovered from
    pub out_spool_dir: PathBuf,
    /// Glob matched against entry names in the output spool
    pub pattern: String,
    pub on_collision: CollisionPolicy,
    pub cross_device: CrossDevicePolicy,
    /// Hold an advisory lock on the output spool for the duration of the run
    pub lock: bool,
    /// If true, report planned moves but do not modify the filesystem
    pub dry_run: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spool_dir: PathBuf::from(SPOOL_DIR_DEFAULT),
            out_spool_dir: PathBuf::from(OUT_SPOOL_DIR_DEFAULT),
            pattern: MESSAGE_PATTERN_DEFAULT.to_string(),
            on_collision: CollisionPolicy::default(),
            cross_device: CrossDevicePolicy::default(),
            lock: true,
            dry_run: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with explicit spool directories; other fields use defaults.
    pub fn new(spool_dir: impl Into<PathBuf>, out_spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            out_spool_dir: out_spool_dir.into(),
            ..Default::default()
        }
    }
}
