//! LLM client for API communication

use super::prompts::DocumentationRequest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default inference endpoint (a local Ollama server)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama3";

const CHAT_COMPLETIONS_ROUTE: &str = "/v1/chat/completions";

/// Errors raised while talking to the inference endpoint
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a complete HTTP response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body is not a chat-completions envelope
    #[error("malformed completion response: {0}")]
    Envelope(String),
}

/// Status and raw body of one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ModelResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message content of the first choice in the body
    pub fn message_content(&self) -> Result<String, ClientError> {
        parse_message_content(&self.body)
    }
}

/// Something that can send a documentation request to a model
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one request; any HTTP status is returned as a response
    async fn send(&self, request: &DocumentationRequest) -> Result<ModelResponse, ClientError>;
}

/// Configuration for LLM client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API endpoint URL
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// API key (optional)
    pub api_key: Option<String>,
    /// Temperature for generation
    pub temperature: Option<f32>,
    /// Request timeout; the transport default applies when unset
    pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: None,
            timeout: None,
        }
    }
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmClient {
    /// Create a new LLM client
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { config, client })
    }

    /// The client's configuration
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Full URL of the chat-completions route
    pub fn completions_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            CHAT_COMPLETIONS_ROUTE
        )
    }

    fn build_body<'a>(&'a self, request: &'a DocumentationRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessageOut {
                    role: "system",
                    content: request.system(),
                },
                ChatMessageOut {
                    role: "user",
                    content: request.content(),
                },
            ],
            stream: false,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait::async_trait]
impl CompletionBackend for LlmClient {
    async fn send(&self, request: &DocumentationRequest) -> Result<ModelResponse, ClientError> {
        let url = self.completions_url();
        let transport = |source: reqwest::Error| ClientError::Transport {
            url: url.clone(),
            source,
        };

        let mut req_builder = self.client.post(&url).json(&self.build_body(request));
        if let Some(ref key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(key);
        }

        tracing::debug!(url = %url, model = %self.config.model, "Sending completion request");

        let response = req_builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        Ok(ModelResponse { status, body })
    }
}

/// Pull `choices[0].message.content` out of a chat-completions body
pub fn parse_message_content(body: &str) -> Result<String, ClientError> {
    let envelope: ChatResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Envelope(e.to_string()))?;

    envelope
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ClientError::Envelope("response has no choices".to_string()))
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessageOut<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessageOut<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageIn,
}

#[derive(Debug, Deserialize)]
struct ChatMessageIn {
    content: String,
}
