use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    /// Transport failure; build it with [`GeminiError::transport`]
    #[error("Request Error: {0}")]
    ReqwestError(reqwest::Error),

    /// No usable API key was found in the secrets file or the environment.
    #[error("🔑 Need the API key, fam. Check your secrets file or env vars.")]
    MissingApiKey,
}

impl GeminiError {
    /// Wrap a reqwest error with its URL removed; the URL can carry credentials.
    pub fn transport(error: reqwest::Error) -> Self {
        GeminiError::ReqwestError(error.without_url())
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
