//! Core library for `spool_recover`.
//!
//! Moves message files that were claimed into an output spool but never processed back
//! into the input spool, keeping each file's name. The pieces:
//! - `config`: a Config with the two spool paths, move policies, XML loading and validation
//! - `fs_ops`: the lazy spool scan and single-entry relocation (rename, copy fallback, lock)
//! - `recover`: the recovery pass tying them together

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod recover;
pub mod shutdown;

pub use config::{
    CONFIG_ENV_VAR, CollisionPolicy, Config, CrossDevicePolicy, LogLevel, default_config_path,
    load_config, path_has_symlink_ancestor,
};
pub use errors::RecoverError;
pub use fs_ops::{RelocateMethod, Relocation, SpoolEntry, SpoolScan};
pub use recover::{RecoverReport, Skipped, recover, scan};
