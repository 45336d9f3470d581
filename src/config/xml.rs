//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Never creates a config file; a missing default file simply means "use defaults".
//!
//! Notes:
//! - This module only reads the config file; directory validation happens in `validate`.
//! - Unknown XML fields and unparseable values are hard errors so misconfigurations surface early.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV_VAR, default_config_path};
use super::types::{CollisionPolicy, Config, CrossDevicePolicy, LogLevel};
use crate::errors::RecoverError;

/// Struct mirroring the XML config for deserialization.
/// Every value is read as text and trimmed before parsing.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    spool_dir: Option<String>,
    out_spool_dir: Option<String>,
    pattern: Option<String>,
    on_collision: Option<String>,
    cross_device: Option<String>,
    lock: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(anyhow!("invalid boolean: '{s}'")),
    }
}

// Map XmlConfig -> Config on top of the built-in defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.spool_dir.as_deref()) {
        cfg.spool_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.out_spool_dir.as_deref()) {
        cfg.out_spool_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.pattern.as_deref()) {
        cfg.pattern = s.to_string();
    }
    if let Some(s) = non_empty(parsed.on_collision.as_deref()) {
        cfg.on_collision = s.parse::<CollisionPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.cross_device.as_deref()) {
        cfg.cross_device = s.parse::<CrossDevicePolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.lock.as_deref()) {
        cfg.lock = parse_bool(s).context("<lock>")?;
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Resolve and load the effective config.
///
/// Search order:
///  - `explicit` (the `--config` flag); must exist
///  - $SPOOL_RECOVER_CONFIG; must exist
///  - `<config_dir>/spool_recover/config.xml`; used only if present
///
/// Returns the config and the file it came from (None when defaults were used).
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let env_set = std::env::var_os(CONFIG_ENV_VAR).is_some_and(|v| !v.is_empty());
    let required = explicit.is_some() || env_set;
    let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => return Ok((Config::default(), None)),
    };

    if !path.exists() {
        if required {
            return Err(RecoverError::NotFound { path }.into());
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok((Config::default(), None));
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok((cfg, Some(path)))
}
