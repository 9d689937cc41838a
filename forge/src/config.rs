use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use gsf_core::config::{get_default_config_file, GeminiConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheScope;

/// Directory name under `~/.config`
pub const APP_NAME: &str = "gsf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    /// TOML file holding `GEMINI_API_KEY`; checked before the environment
    pub secrets_path: PathBuf,
    pub cache_scope: CacheScope,
    pub gemini: GeminiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            secrets_path: PathBuf::from(".gsf/secrets.toml"),
            cache_scope: CacheScope::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `~/.config/gsf/config.toml` when it exists, otherwise defaults.
    ///
    /// Returns the path that was read, if any.
    pub fn load_from_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match get_default_config_file(APP_NAME) {
            Ok(path) if path.exists() => Ok((Self::load_from_file(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }
}
