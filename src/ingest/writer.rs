use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use crate::error::{Rdf2RespecError, Result};

/// Extension of rendered documents
pub const OUTPUT_EXTENSION: &str = "md";

/// What happened to an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing output already had identical content.
    Unchanged,
}

/// `<output_dir>/<stem>.md`
pub fn output_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

/// Compute SHA256 hash of content
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Write rendered Markdown, creating the output directory when needed.
///
/// Skips the write when the file on disk already hashes to the same content.
pub fn write_output(path: &Path, content: &str) -> Result<WriteOutcome> {
    let write_error = |source: std::io::Error| Rdf2RespecError::RenderWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Ok(existing) = std::fs::read(path) {
        if content_hash(&existing) == content_hash(content.as_bytes()) {
            log::debug!("Unchanged: {}", path.display());
            return Ok(WriteOutcome::Unchanged);
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
    }
    std::fs::write(path, content).map_err(write_error)?;
    Ok(WriteOutcome::Written)
}
