use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub clean: CleanConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Developer root override (defaults to ~/Library/Developer)
    pub developer_dir: Option<PathBuf>,
    /// Custom derived-data folder, scanned in addition to the default
    pub custom_derived_data: Option<PathBuf>,
    /// Custom archives folder, scanned in addition to the default
    pub custom_archives: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Ask for confirmation before deleting
    pub confirm: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { confirm: true }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from the default
    /// location if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xcsweep").join("config.toml"))
    }

    /// Developer root to scan: the configured override, or the per-user
    /// default.
    pub fn developer_dir(&self) -> Option<PathBuf> {
        self.paths
            .developer_dir
            .clone()
            .or_else(default_developer_dir)
    }
}

/// The per-user developer folder, `~/Library/Developer`.
pub fn default_developer_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Library").join("Developer"))
}
