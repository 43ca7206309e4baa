//! Runtime configuration.
//!
//! Read from a TOML file (`--config`, else `~/.poligonos/config.toml` when it
//! exists). Every field has a default, so a missing file or a partial file
//! is fine. CLI flags are applied on top by the binary.

use crate::catalog::{SANTA_CRUZ_COUNTRY, SANTA_CRUZ_REGION};
use crate::location::providers::{DEFAULT_USER_AGENT, NOMINATIM_SEARCH_URL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region appended to geocoding queries.
    pub region: String,
    pub country: String,
    /// Skip the geocoder and use built-in coordinates only.
    pub offline: bool,
    pub geocoder_url: String,
    pub user_agent: String,
    /// Per-request geocoder timeout.
    pub timeout_secs: u64,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: SANTA_CRUZ_REGION.to_string(),
            country: SANTA_CRUZ_COUNTRY.to_string(),
            offline: false,
            geocoder_url: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 5,
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Cannot read config {}: {}", path.display(), e),
            Self::Parse(path, e) => write!(f, "Invalid config {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_toml_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".poligonos").join("config.toml"))
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
