//! Single-file documentation: read, ask the model, extract, write back

use crate::extract::{extract_code, ExtractError};
use crate::llm::{ClientError, CompletionBackend, DocumentationRequest};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Longest slice of an error body echoed into logs
const LOGGED_BODY_CHARS: usize = 200;

/// Why a file was left unchanged
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("{0}")]
    Request(#[source] ClientError),
    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Envelope(#[source] ClientError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("model returned an empty code block")]
    EmptyCode,
    #[error("failed to write file: {0}")]
    Write(#[source] std::io::Error),
}

/// Result of documenting one file
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was rewritten with the model's code
    Documented,
    /// The path was not a regular file
    Skipped,
    /// Something went wrong; the file is unchanged
    Failed(DocumentError),
}

impl FileOutcome {
    pub fn is_documented(&self) -> bool {
        matches!(self, FileOutcome::Documented)
    }
}

/// Documents one file at a time through a [`CompletionBackend`]
pub struct FileDocumenter<B> {
    backend: B,
}

impl<B: CompletionBackend> FileDocumenter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Document a single file.
    ///
    /// The file is rewritten only when the model answers with a 2xx status
    /// and a non-empty fenced code block. Every failure is logged and
    /// reported in the returned outcome; none is propagated.
    pub async fn document_file(&self, path: &Path) -> FileOutcome {
        if !path.is_file() {
            tracing::debug!(path = ?path, "Not a regular file, skipping");
            return FileOutcome::Skipped;
        }

        match self.try_document(path).await {
            Ok(()) => {
                tracing::info!(path = ?path, "Documented file");
                FileOutcome::Documented
            }
            Err(e) => {
                tracing::warn!(path = ?path, "Failed to document file: {}", e);
                FileOutcome::Failed(e)
            }
        }
    }

    async fn try_document(&self, path: &Path) -> Result<(), DocumentError> {
        let content = std::fs::read_to_string(path).map_err(DocumentError::Read)?;

        let response = {
            let request = DocumentationRequest::new(content);
            self.backend
                .send(&request)
                .await
                .map_err(DocumentError::Request)?
        };

        if !response.is_success() {
            return Err(DocumentError::Status {
                status: response.status,
                body: response.body.chars().take(LOGGED_BODY_CHARS).collect(),
            });
        }

        let message = response
            .message_content()
            .map_err(DocumentError::Envelope)?;
        let code = extract_code(&message)?;
        if code.is_empty() {
            return Err(DocumentError::EmptyCode);
        }

        replace_file(path, &code).map_err(DocumentError::Write)
    }
}

/// Replace the file behind `path` with `content` through a sibling
/// temporary file.
///
/// Symlinks are resolved first so the link target is rewritten and the link
/// itself survives. A read-only or unwritable target is refused with
/// `PermissionDenied`. The original stays intact unless the final rename
/// succeeds.
fn replace_file(path: &Path, content: &str) -> std::io::Result<()> {
    let target = std::fs::canonicalize(path)?;
    let permissions = std::fs::metadata(&target)?.permissions();
    if permissions.readonly() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("{:?} is read-only", target),
        ));
    }
    // Fails with PermissionDenied when the process may not write the file.
    std::fs::OpenOptions::new().write(true).open(&target)?;

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;

    Ok(())
}
