use crate::errors::{GeminiError, GeminiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the credential, both as a secrets-file key and an environment variable
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Public Gemini REST endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration struct for Gemini API
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    /// Never read from or written to config files; see [`resolve_api_key`].
    #[serde(skip)]
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Returns a copy carrying `api_key`
    pub fn with_api_key(&self, api_key: String) -> Self {
        Self {
            api_key: Some(api_key),
            ..self.clone()
        }
    }
}

/// Resolves the API key from the secrets file, falling back to the process environment
pub fn resolve_api_key(secrets_path: &Path) -> GeminiResult<String> {
    resolve_api_key_with(secrets_path, |name| std::env::var(name).ok())
}

/// Resolves the API key from the secrets file, falling back to `lookup_env`.
///
/// A missing secrets file is not an error. A secrets file that exists but
/// cannot be read or parsed is. Blank values count as absent.
pub fn resolve_api_key_with<F>(secrets_path: &Path, lookup_env: F) -> GeminiResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = read_secret(secrets_path, API_KEY_VAR)? {
        debug!(path = %secrets_path.display(), "Using API key from secrets file");
        return Ok(key);
    }

    match lookup_env(API_KEY_VAR).filter(|value| !value.trim().is_empty()) {
        Some(key) => {
            debug!("Using API key from environment");
            Ok(key)
        }
        None => Err(GeminiError::MissingApiKey),
    }
}

fn read_secret(path: &Path, name: &str) -> GeminiResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        GeminiError::ConfigError(format!(
            "Failed to read secrets file {}: {}",
            path.display(),
            e
        ))
    })?;

    let table: toml::Table = toml::from_str(&content).map_err(|e| {
        GeminiError::ConfigError(format!(
            "Failed to parse secrets file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(table
        .get(name)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string))
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
