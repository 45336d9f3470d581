//! Config module.
//! Provides configuration types, the config file location, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV_VAR, default_config_path, path_has_symlink_ancestor};
pub use types::{CollisionPolicy, Config, CrossDevicePolicy, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Defaults shared across submodules; relative to the working directory.
pub const SPOOL_DIR_DEFAULT: &str = "spool";
pub const OUT_SPOOL_DIR_DEFAULT: &str = "out_spool";
pub const MESSAGE_PATTERN_DEFAULT: &str = "*.message";
