//! Cache location and naming.
//!
//! The data directory comes from an explicit override, `SEALCACHE_DATA_DIR`,
//! or the platform data directory. An optional `config.toml` inside it may
//! rename the cache file or the application name used for key entropy.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Resolved cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name mixed into the derived file key.
    pub app_name: String,
    /// Directory holding the cache file.
    pub data_dir: PathBuf,
    /// Cache file name inside `data_dir`.
    pub file_name: String,
}

/// Optional overrides read from `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    app_name: Option<String>,
    file_name: Option<String>,
}

impl Config {
    /// Configuration rooted at `data_dir` with default names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: constants::APP_NAME.to_string(),
            data_dir: data_dir.into(),
            file_name: constants::CACHE_FILE.to_string(),
        }
    }

    /// Resolve the configuration for this process.
    ///
    /// `dir` takes precedence over the platform data directory. The CLI
    /// feeds `SEALCACHE_DATA_DIR` through it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDataDir` if no directory can be determined,
    /// or `ConfigError::Parse` if `config.toml` is malformed.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match dir {
            Some(dir) => dir,
            None => Self::default_dir()?,
        };
        debug!(data_dir = %data_dir.display(), "resolving config");

        let mut config = Self::new(data_dir);
        if let Some(file) = Self::read_file(&config.data_dir)? {
            if let Some(app_name) = file.app_name {
                config.app_name = app_name;
            }
            if let Some(file_name) = file.file_name {
                config.file_name = file_name;
            }
        }
        Ok(config)
    }

    /// Full path of the cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    fn default_dir() -> Result<PathBuf> {
        let base = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(base.join(constants::APP_NAME))
    }

    fn read_file(data_dir: &Path) -> Result<Option<FileConfig>> {
        let path = data_dir.join(constants::CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "loading config file");

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let file: FileConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(Some(file))
    }
}
