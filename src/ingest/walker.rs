use walkdir::WalkDir;
use std::path::{Path, PathBuf};
use crate::error::{Rdf2RespecError, Result};

/// A graph document discovered under a source's input location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    /// File name without extension; the rendered output takes this name.
    pub stem: String,
}

/// Discover graph documents under `root`.
///
/// Recursively walks the directory tree and keeps regular files whose name ends
/// in `.<extension>` (case-insensitive) and whose path contains none of the
/// `ignores` substrings. Results are sorted by relative path.
pub fn discover_files(root: &Path, extension: &str, ignores: &[String]) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(Rdf2RespecError::SourceLocation {
            path: root.to_path_buf(),
            message: "not an existing directory".to_string(),
        });
    }

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Rdf2RespecError::SourceLocation {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if !file_name.ends_with(&suffix) {
            continue;
        }

        let path_str = path.to_string_lossy();
        if ignores.iter().any(|ignore| path_str.contains(ignore.as_str())) {
            log::debug!("Ignoring {}", path.display());
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .map_err(|_| Rdf2RespecError::Config(
                format!("Failed to compute relative path for: {}", path.display())
            ))?
            .to_string_lossy()
            .replace('\\', "/");

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        files.push(SourceFile {
            relative_path,
            absolute_path: path.to_path_buf(),
            stem,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::info!("Discovered {} files in {}", files.len(), root.display());
    Ok(files)
}
