//! Error types for CSVDrop

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CSVDrop operations
pub type Result<T> = std::result::Result<T, CsvDropError>;

/// Main error type for CSVDrop
///
/// Every variant raised during a processing attempt is retryable; the
/// pipeline treats them identically until the attempt budget runs out.
#[derive(Error, Debug)]
pub enum CsvDropError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Relocation failed: {} -> {}: {reason}", src.display(), dst.display())]
    Relocation {
        src: PathBuf,
        dst: PathBuf,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CsvDropError {
    /// Build a `Relocation` error from a source/destination pair and cause.
    pub fn relocation(src: &std::path::Path, dst: &std::path::Path, reason: impl ToString) -> Self {
        CsvDropError::Relocation {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_relocation_display_names_both_paths() {
        let err = CsvDropError::relocation(
            Path::new("/in/a.csv"),
            Path::new("/out/a.csv"),
            "permission denied",
        );
        let msg = err.to_string();
        assert!(msg.contains("/in/a.csv"));
        assert!(msg.contains("/out/a.csv"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: CsvDropError = io.into();
        assert!(matches!(err, CsvDropError::Io(_)));
    }
}
