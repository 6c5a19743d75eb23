//! Configuration for xstat
//!
//! Loads configuration from TOML file at `~/.config/xstat/config.toml`.
//! A missing file means defaults: connect to `$DISPLAY`, default log filter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{XstatError, XstatResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// X display to connect to, e.g. `":1"`. `$DISPLAY` when unset.
    pub display: Option<String>,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> XstatResult<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> XstatResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| XstatError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| XstatError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;

        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xstat").join("config.toml"))
    }
}
