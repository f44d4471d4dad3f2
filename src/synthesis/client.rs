use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::prompt::synthesis_prompt;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::model::WordBundle;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey")]
    ApiKeyNotSet,

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("model returned no text (finish reason: {0})")]
    EmptyResponse(String),

    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Produces a short natural-language synthesis of a bundle.
/// Implemented by `GeminiClient` for production; mock implementations used in tests.
pub trait Summarizer {
    async fn summarize(&self, bundle: &WordBundle) -> Result<String, SynthesisError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_env(http: Client) -> Result<Self, SynthesisError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| SynthesisError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(SynthesisError::ApiKeyNotSet);
        }
        let model = env::var("GEMINI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }

    async fn generate(&self, prompt: String) -> Result<GenerateContentResponse, SynthesisError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&GenerateContentRequest::user(prompt))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let decoded = check_response(status, &body)
            .inspect_err(|e| warn!(status, error = %e, "Gemini generation failed"))?;
        debug!(model = %self.model, "gemini generation complete");
        Ok(decoded)
    }
}

impl Summarizer for GeminiClient {
    /// Single attempt; a failed generation is reported, not retried.
    async fn summarize(&self, bundle: &WordBundle) -> Result<String, SynthesisError> {
        let response = self.generate(synthesis_prompt(bundle)).await?;
        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .as_ref()
                .and_then(|c| c.first())
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "unknown".to_string());
            warn!(%reason, "Gemini returned empty synthesis");
            SynthesisError::EmptyResponse(reason)
        })
    }
}

/// Turn a raw `generateContent` answer into a decoded response or a
/// classified error. An `error` object in the body wins over the HTTP status,
/// including on 200.
fn check_response(status: u16, body: &str) -> Result<GenerateContentResponse, SynthesisError> {
    let decoded = serde_json::from_str::<GenerateContentResponse>(body);
    if let Ok(GenerateContentResponse {
        error: Some(err), ..
    }) = &decoded
    {
        let code = err.code.or((status >= 400).then_some(status));
        let message = err.message.clone().unwrap_or_else(|| "no message".to_string());
        return Err(classify(code, message));
    }

    match (status, decoded) {
        (200..=299, Ok(response)) => Ok(response),
        (200..=299, Err(e)) => Err(SynthesisError::Malformed(e)),
        (code, _) => {
            let snippet: String = body.chars().take(200).collect();
            Err(classify(Some(code), format!("HTTP {code}: {snippet}")))
        }
    }
}

fn classify(code: Option<u16>, message: String) -> SynthesisError {
    match code {
        Some(429) => SynthesisError::RateLimited,
        Some(403) => SynthesisError::QuotaExhausted(message),
        Some(code) => SynthesisError::Api { code, message },
        None => SynthesisError::Api { code: 0, message },
    }
}
