//! The documentation pipeline
//!
//! [`Documenter::run`] classifies a target path, expands directories into
//! candidate source files, and hands each file to a [`FileDocumenter`] in
//! turn. Files are processed one after another; a failure on one file never
//! stops the run.

mod processor;

pub use processor::{DocumentError, FileDocumenter, FileOutcome};

use crate::config::DocumenterSettings;
use crate::llm::{CompletionBackend, LlmClient};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a target path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
    Missing,
}

impl TargetKind {
    /// Classify a path
    pub fn of(path: &Path) -> Self {
        if path.is_dir() {
            TargetKind::Directory
        } else if path.is_file() {
            TargetKind::File
        } else {
            TargetKind::Missing
        }
    }
}

/// Counts of per-file outcomes for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documented: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Documented => self.documented += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of files handed to the file documenter
    pub fn total(&self) -> usize {
        self.documented + self.skipped + self.failed
    }
}

/// Documents a file or every matching file under a directory
pub struct Documenter<B> {
    files: FileDocumenter<B>,
    extensions: BTreeSet<String>,
}

impl Documenter<LlmClient> {
    /// Build a documenter backed by the HTTP client
    pub fn from_settings(settings: DocumenterSettings) -> Result<Self> {
        let client = LlmClient::new(settings.llm)?;
        Ok(Self::new(client, settings.extensions))
    }
}

impl<B: CompletionBackend> Documenter<B> {
    /// `extensions` are lowercase and dot-free, as produced by
    /// [`DocumenterSettings`]
    pub fn new(backend: B, extensions: BTreeSet<String>) -> Self {
        Self {
            files: FileDocumenter::new(backend),
            extensions,
        }
    }

    pub fn file_documenter(&self) -> &FileDocumenter<B> {
        &self.files
    }

    /// Document `target`.
    ///
    /// A missing target is logged and yields an empty summary. A directory is
    /// expanded to its source files; a single file is documented whatever its
    /// extension.
    pub async fn run(&self, target: impl AsRef<Path>) -> RunSummary {
        let target = target.as_ref();
        let mut summary = RunSummary::default();

        let candidates = match TargetKind::of(target) {
            TargetKind::Missing => {
                tracing::warn!(path = ?target, "Path is neither a file nor a directory");
                return summary;
            }
            TargetKind::File => vec![target.to_path_buf()],
            TargetKind::Directory => {
                let files = self.candidate_files(target);
                tracing::info!(
                    path = ?target,
                    files = files.len(),
                    "Found source files to document"
                );
                files
            }
        };

        for path in &candidates {
            let outcome = self.files.document_file(path).await;
            summary.record(&outcome);
        }

        tracing::info!(
            documented = summary.documented,
            failed = summary.failed,
            skipped = summary.skipped,
            "Documentation run complete"
        );

        summary
    }

    /// Regular files under `dir` with a configured extension, in a stable
    /// depth-first, name-sorted order
    pub fn candidate_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}
