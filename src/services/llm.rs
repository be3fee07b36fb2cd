use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::ChatMessage;

/// Errors that can occur when calling the text-generation API
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Model returned no content")]
    EmptyContent,

    #[error("Text generation is not configured: missing API key")]
    NotConfigured,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generation parameters for one completion
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Client for an OpenAI-compatible chat completions API
///
/// The model output is treated as opaque text; nothing structured is
/// parsed out of it.
#[derive(Clone)]
pub struct LlmClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl LlmClient {
    /// Create a new client
    ///
    /// `endpoint` is the API base, e.g. `https://api.openai.com/v1`.
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a conversation and return the generated reply text
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::NotConfigured);
        }

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(
            "Requesting completion from {} ({} messages, model {})",
            url,
            messages.len(),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
