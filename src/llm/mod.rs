//! LLM access for documentation generation
//!
//! This module handles:
//! - The fixed documentation prompt
//! - Sending a file to an OpenAI-compatible chat-completions endpoint
//! - Parsing the completion envelope

mod client;
#[cfg(test)]
mod mock;
mod prompts;

pub use client::{
    parse_message_content, ClientError, CompletionBackend, LlmClient, LlmConfig, ModelResponse,
    DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
#[cfg(test)]
pub use mock::MockLlmClient;
pub use prompts::{DocumentationRequest, DOCUMENT_SYSTEM_PROMPT};
