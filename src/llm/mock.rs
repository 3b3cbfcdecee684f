//! Scripted completion backend for tests

use super::client::{ClientError, CompletionBackend, ModelResponse};
use super::prompts::DocumentationRequest;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Build a chat-completions body whose single choice carries `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
    .to_string()
}

/// Mock backend for testing
///
/// Replays queued responses in order and records the content of every
/// request it receives. When the queue is empty it answers with HTTP 500.
#[derive(Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<ModelResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Create a new mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.lock_responses().push_back(ModelResponse {
            status,
            body: body.into(),
        });
    }

    /// Queue a successful response whose message content is `content`
    pub fn push_completion(&self, content: &str) {
        self.push_response(200, completion_body(content));
    }

    /// File contents received so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<ModelResponse>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl CompletionBackend for MockLlmClient {
    async fn send(&self, request: &DocumentationRequest) -> Result<ModelResponse, ClientError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.content().to_string());

        Ok(self.lock_responses().pop_front().unwrap_or(ModelResponse {
            status: 500,
            body: "no mock response queued".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_replays_and_records() {
        let mock = MockLlmClient::new();
        mock.push_completion("```\nfirst\n```");

        let first = mock.send(&DocumentationRequest::new("a")).await.unwrap();
        let second = mock.send(&DocumentationRequest::new("b")).await.unwrap();

        assert_eq!(first.message_content().unwrap(), "```\nfirst\n```");
        assert_eq!(second.status, 500);
        assert_eq!(mock.requests(), vec!["a".to_string(), "b".to_string()]);
    }
}
