//! Configuration file discovery and loading
//!
//! Config file priority order:
//! 1. Path named by the `RUNIFY_CONFIG` environment variable
//! 2. User config directory (`~/.config/runify/config.toml` on Linux)
//! 3. System-wide file (`/etc/runify/config.toml`, Linux only)
//!
//! A missing config file is not an error: callers fall back to built-in
//! defaults. A file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application directory name used under the platform config dir
pub const APP_NAME: &str = "runify";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RUNIFY_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// User-Agent sent with every outbound HTTP request
pub fn get_user_agent() -> String {
    format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION"))
}

/// Value is usable (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Read an environment variable, treating blank values as unset
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|v| is_valid_value(v))
        .map(|v| v.trim().to_string())
}

/// Locate the config file to load, if any
///
/// An explicit `RUNIFY_CONFIG` path that does not exist is an error; the
/// implicit locations are simply skipped when absent.
pub fn locate_config_file() -> Result<Option<PathBuf>> {
    if let Some(explicit) = env_value(CONFIG_ENV_VAR) {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(Error::Config(format!(
            "{} points to a missing file: {}",
            CONFIG_ENV_VAR,
            path.display()
        )));
    }

    let user_config = dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILE_NAME));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_NAME).join(CONFIG_FILE_NAME);
        if system_config.exists() {
            return Ok(Some(system_config));
        }
    }

    Ok(None)
}

/// Parse a TOML config file into `T`
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load `T` from the discovered config file, or defaults when there is none
///
/// Returns the path that was loaded so the caller can report it once logging
/// is up.
pub fn load_config<T: DeserializeOwned + Default>() -> Result<(T, Option<PathBuf>)> {
    match locate_config_file()? {
        Some(path) => {
            let config = load_toml_file(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((T::default(), None)),
    }
}
