//! Typed error definitions for spool_recover.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoverError {
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("Destination already exists: {dest}")]
    Collision { dest: PathBuf },

    #[error("Cannot rename across devices: '{src}' -> '{dest}'")]
    CrossDevice { src: PathBuf, dest: PathBuf },

    #[error("Another recovery run holds the spool lock: {path}")]
    Locked { path: PathBuf },

    #[error("Input and output spool resolve to the same directory: {path}")]
    SameDirectory { path: PathBuf },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl RecoverError {
    /// Stable process exit code per failure kind.
    pub fn code(&self) -> u8 {
        match self {
            RecoverError::NotFound { .. } => 2,
            RecoverError::NotADirectory { .. } => 3,
            RecoverError::PermissionDenied { .. } => 4,
            RecoverError::Collision { .. } => 5,
            RecoverError::CrossDevice { .. } => 6,
            RecoverError::Locked { .. } => 7,
            RecoverError::SameDirectory { .. } => 8,
            RecoverError::Interrupted => 130,
        }
    }

    /// Short machine-friendly name used as the `kind` field in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecoverError::NotFound { .. } => "not_found",
            RecoverError::NotADirectory { .. } => "not_a_directory",
            RecoverError::PermissionDenied { .. } => "permission_denied",
            RecoverError::Collision { .. } => "collision",
            RecoverError::CrossDevice { .. } => "cross_device",
            RecoverError::Locked { .. } => "locked",
            RecoverError::SameDirectory { .. } => "same_directory",
            RecoverError::Interrupted => "interrupted",
        }
    }

    /// The path most relevant to the failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            RecoverError::NotFound { path }
            | RecoverError::NotADirectory { path }
            | RecoverError::PermissionDenied { path, .. }
            | RecoverError::Locked { path }
            | RecoverError::SameDirectory { path } => Some(path),
            RecoverError::Collision { dest } => Some(dest),
            RecoverError::CrossDevice { src, .. } => Some(src),
            RecoverError::Interrupted => None,
        }
    }
}
