//! codedoc - add documentation comments to source files with an LLM
//!
//! This library provides the documentation pipeline: finding source files,
//! asking a chat-completions endpoint to document them, extracting the
//! returned code, and rewriting each file only when that all succeeds.

pub mod cli;
pub mod config;
pub mod documenter;
pub mod extract;
pub mod llm;

/// Re-export commonly used types
pub use config::{Config, ConfigContext, DocumenterSettings};
pub use documenter::{Documenter, FileDocumenter, FileOutcome, RunSummary};
pub use extract::extract_code;
pub use llm::{CompletionBackend, LlmClient, LlmConfig};

/// Application-wide error type
pub use anyhow::Result;
