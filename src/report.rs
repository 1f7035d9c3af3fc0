use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ingest::WriteOutcome;

/// Result for one input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Written,
    Unchanged,
    Failed { message: String },
    Cancelled,
}

impl From<WriteOutcome> for FileStatus {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Written => FileStatus::Written,
            WriteOutcome::Unchanged => FileStatus::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Per-source outcome; `error` is set when the source aborted before rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub error: Option<String>,
    pub files: Vec<FileOutcome>,
}

impl SourceReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn failed(source: impl Into<String>, error: impl ToString) -> Self {
        Self {
            source: source.into(),
            error: Some(error.to_string()),
            files: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Written))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Unchanged))
    }

    pub fn failed_files(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Cancelled))
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failed_files() == 0 && self.cancelled() == 0
    }
}

/// Summary of one run, serialised with `--report`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn new(sources: Vec<SourceReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            sources,
        }
    }

    pub fn is_success(&self) -> bool {
        self.sources.iter().all(SourceReport::is_success)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::Rdf2RespecError::Config(format!("Failed to serialize report: {}", e)))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| crate::error::Rdf2RespecError::RenderWrite {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}
