//! AI text generation
//!
//! Transport layer for the Gemini generateContent API. The [`TextGenerator`]
//! trait is the seam the plan services program against, so tests can swap in
//! a canned generator and wiremock can stand in for the real endpoint via
//! `base_url`.
//!
//! The client holds the prompt-free mechanics only; prompt construction and
//! reply parsing live in the plans service.

use crate::config::AiConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// AI relay errors
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key configured; surfaces as HTTP 503
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI service returned an empty response")]
    EmptyResponse,
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => ApiError::ServiceUnavailable(
                "AI service is not configured. Please contact the administrator.".to_string(),
            ),
            other => ApiError::Internal(anyhow::anyhow!(other)),
        }
    }
}

/// Text generation seam
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a text completion for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    /// Whether the generator is ready to serve requests
    ///
    /// Checked before any prompt is built so an unconfigured deployment
    /// fails fast without touching the database.
    fn is_configured(&self) -> bool;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini generateContent client
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// Fails only if the underlying HTTP client cannot be constructed; a
    /// missing API key is a valid (degraded) state.
    pub fn from_config(config: &AiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generation request");

        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "AI service returned an error");
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(AiError::EmptyResponse)?;

        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Strip a Markdown code fence from a model reply
///
/// Models routinely wrap JSON answers in ```json fences even when asked not
/// to. Returns the inner text, or the trimmed input when no fence is found.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the language tag on the opening fence line
    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => return trimmed,
    };

    match body.rsplit_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_key: Option<&str>) -> AiConfig {
        AiConfig {
            api_key: api_key.map(String::from),
            ..AiConfig::default()
        }
    }

    #[test]
    fn test_unconfigured_client_reports_state() {
        let client = GeminiClient::from_config(&test_config(None)).unwrap();
        assert!(!client.is_configured());

        let client = GeminiClient::from_config(&test_config(Some("key"))).unwrap();
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_generate_fails_without_network() {
        let client = GeminiClient::from_config(&test_config(None)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_plain_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fences("plain text"), "plain text");
    }

    #[test]
    fn test_unterminated_fence_keeps_body() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }
}
