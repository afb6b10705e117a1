//! Gemini-style `generateContent` client.
//!
//! Sends the composed prompt as a single text part and consumes only the
//! first candidate's first text part. The endpoint signals errors through
//! a structured `error.message` field in the response body rather than
//! solely by HTTP status, so the body is checked for it even on 200.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use unihelp_core::completion::CompletionClient;
use unihelp_core::error::CompletionError;

/// A client for a Gemini-style generative-language endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// `api_key` may be `None`: the client still constructs, and every
    /// `complete` call fails with `MissingCredential` without touching the
    /// network — the demo fallback path.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        }
    }

    /// Create a client against the hosted Google endpoint.
    pub fn hosted(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self::new(
            "https://generativelanguage.googleapis.com/v1beta",
            model,
            api_key,
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        // Credential check happens before any network I/O.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        // The endpoint reports errors in the body even on HTTP success.
        if let Some(error) = api_response.error {
            warn!(message = %error.message, "Completion endpoint returned error payload");
            return Err(CompletionError::Upstream(error.message));
        }

        extract_text(api_response)
    }
}

/// Pull the first candidate's first text part out of a parsed response.
fn extract_text(response: ApiResponse) -> Result<String, CompletionError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| CompletionError::InvalidResponse("No candidates in response".into()))
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}
