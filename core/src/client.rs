use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

/// The API key travels in this header, never in the URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// A remote text generator: prompt in, text out, fallible.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run a single generation call against `model`.
    async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> GeminiResult<String>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: Url,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let api_base = Url::parse(config.api_base.trim_end_matches('/')).map_err(|e| {
            GeminiError::ConfigError(format!("Invalid API base URL '{}': {}", config.api_base, e))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| GeminiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base,
        })
    }

    /// Build the generateContent URL for `model`
    fn endpoint(&self, model: &str) -> GeminiResult<Url> {
        Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            model
        ))
        .map_err(|e| GeminiError::ConfigError(format!("Invalid model endpoint: {}", e)))
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.endpoint(model)?;

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(GeminiError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(GeminiError::transport)?;

            let message = match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                Ok(parsed) if parsed.error.status.is_empty() => parsed.error.message,
                Ok(parsed) => format!("{} ({})", parsed.error.message, parsed.error.status),
                Err(_) => format!("API request failed: {}", error_body),
            };

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                GeminiError::ParsingError(format!("Failed to parse response: {}", e.without_url()))
            })?;

        Ok(response_body)
    }

    /// Helper method to extract text from a response
    ///
    /// Concatenates every text part of the first candidate. A response with
    /// no candidates, no text, or only whitespace is an error.
    pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
        let candidate = match response.candidates.first() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|feedback| feedback.block_reason.clone());
                return Err(GeminiError::ResponseError(match reason {
                    Some(reason) => format!("Prompt was blocked: {}", reason),
                    None => "No candidates in response".to_string(),
                }));
            }
        };

        if let Some(reason) = &candidate.finish_reason {
            if reason != "STOP" {
                warn!(finish_reason = %reason, "Gemini generation did not finish cleanly");
            }
        }

        let content = candidate
            .content
            .as_ref()
            .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(GeminiError::ResponseError("No text in response".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> GeminiResult<String> {
        debug!(model, prompt_len = prompt.len(), temperature, "Calling Gemini generateContent");

        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: Some(temperature),
                ..Default::default()
            }),
        };

        let response = self.generate_content(model, request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini token usage"
            );
        }

        Self::extract_text_from_response(&response)
    }
}
