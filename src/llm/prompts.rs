//! Prompt templates for LLM interactions

/// Instruction sent as the system message with every file
pub const DOCUMENT_SYSTEM_PROMPT: &str = r#"You are a senior software engineer writing documentation comments.

Add documentation comments to the following code, using the comment conventions of its language.

Guidelines:
- Document every type, function and method that lacks documentation
- Do not change the behavior, names or formatting of the code
- Keep existing comments unless they are wrong

Return only the modified code in a single fenced code block, with no explanation before or after it.
"#;

/// A single file's content paired with the documentation instruction
#[derive(Debug, Clone)]
pub struct DocumentationRequest {
    system: &'static str,
    content: String,
}

impl DocumentationRequest {
    /// Create a request for the given file content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            system: DOCUMENT_SYSTEM_PROMPT,
            content: content.into(),
        }
    }

    /// The system instruction
    pub fn system(&self) -> &str {
        self.system
    }

    /// The user payload (the file's full text)
    pub fn content(&self) -> &str {
        &self.content
    }
}
