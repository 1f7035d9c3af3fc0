use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::Direction;

/// Main error type for rdf2respec
#[derive(Error, Debug)]
pub enum Rdf2RespecError {
    /// A name without a namespace separator was presented for resolution
    #[error("Invalid identifier (expected prefix:local or an absolute IRI): {0}")]
    InvalidIdentifier(String),

    /// A mapping field could not be resolved against the prefix table
    #[error("Could not resolve {field} '{value}' to a valid IRI")]
    ConfigResolution { field: String, value: String },

    /// Paragraph type other than `hierarchical`
    #[error("Unsupported paragraph type '{0}': only hierarchical mappings are supported")]
    UnsupportedMappingType(String),

    /// Hierarchy direction without an implementation
    #[error("Unsupported hierarchical relation direction: {0}")]
    UnsupportedDirection(Direction),

    /// Input location missing or unreadable
    #[error("Cannot resolve source location {path}: {message}")]
    SourceLocation { path: PathBuf, message: String },

    /// Rendered output could not be written
    #[error("Failed to write {path}: {source}")]
    RenderWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph serialization parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// A predicate chain loops back on itself
    #[error("Cycle detected in predicate chain at {0}")]
    ChainCycle(String),

    /// Processing stopped by an external signal
    #[error("Cancelled")]
    Cancelled,
}

impl Rdf2RespecError {
    /// Whether this error aborts the whole source rather than a single file.
    pub fn is_source_fatal(&self) -> bool {
        matches!(
            self,
            Rdf2RespecError::InvalidIdentifier(_)
                | Rdf2RespecError::ConfigResolution { .. }
                | Rdf2RespecError::UnsupportedMappingType(_)
                | Rdf2RespecError::UnsupportedDirection(_)
                | Rdf2RespecError::SourceLocation { .. }
                | Rdf2RespecError::Config(_)
        )
    }
}

/// Convenient Result type using Rdf2RespecError
pub type Result<T> = std::result::Result<T, Rdf2RespecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Rdf2RespecError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_config_resolution_names_field() {
        let err = Rdf2RespecError::ConfigResolution {
            field: "sectionTitlePredicate".to_string(),
            value: "foo:bar".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sectionTitlePredicate"));
        assert!(msg.contains("foo:bar"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Rdf2RespecError = io_err.into();
        assert!(matches!(err, Rdf2RespecError::Io(_)));
    }

    #[test]
    fn test_source_fatal_classification() {
        assert!(Rdf2RespecError::UnsupportedDirection(Direction::Downward).is_source_fatal());
        assert!(Rdf2RespecError::UnsupportedMappingType("flat".into()).is_source_fatal());
        assert!(!Rdf2RespecError::Parse("bad turtle".into()).is_source_fatal());
        let write = Rdf2RespecError::RenderWrite {
            path: PathBuf::from("out.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!write.is_source_fatal());
    }
}
