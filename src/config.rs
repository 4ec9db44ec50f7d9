//! User configuration loaded from `config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::calculator::{EngineContext, NumberLocale};

/// Balance shown when nothing else is configured.
pub const DEFAULT_BALANCE: f64 = 24757.22;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference balance for the percentage keys.
    pub balance: f64,
    /// Cap on digits per number; no cap when absent.
    pub max_input_length: Option<usize>,
    pub locale: NumberLocale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            max_input_length: None,
            locale: NumberLocale::default(),
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/balance-calc/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("balance-calc").join("config.toml"))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The engine inputs this config describes.
    pub fn engine_context(&self) -> EngineContext {
        EngineContext {
            balance: self.balance,
            max_input_length: self.max_input_length,
        }
    }
}
