use gsf_core::client::GeminiClient;
use gsf_core::config::resolve_api_key_with;
use gsf_core::GeminiError;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

/// Why the daemon could not get a working Gemini client
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{0}")]
    Credentials(GeminiError),

    #[error("❌ Error initializing Gemini: {0}")]
    ClientInit(GeminiError),
}

/// Build the Gemini client using the process environment as the key fallback
pub fn build_client(config: &AppConfig) -> Result<GeminiClient, StartupError> {
    build_client_with(config, |name| std::env::var(name).ok())
}

/// Resolve the API key (secrets file first, then `lookup_env`) and build the client
pub fn build_client_with<F>(config: &AppConfig, lookup_env: F) -> Result<GeminiClient, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key =
        resolve_api_key_with(&config.secrets_path, lookup_env).map_err(StartupError::Credentials)?;

    let client = GeminiClient::new(config.gemini.with_api_key(api_key))
        .map_err(StartupError::ClientInit)?;
    info!("Initialized Gemini client");
    Ok(client)
}
