use crate::config::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadtimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Path not found or inaccessible: {}", path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported input file: {} (supported: {supported})", path.display())]
    UnsupportedInput { path: PathBuf, supported: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReadtimeError {
    /// Process exit status for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReadtimeError::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Failure to pull text out of a single document.
///
/// These never abort a run: the collector turns them into a zero-valued row.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("EPUB extraction failed: {0}")]
    Epub(String),

    #[error("Document part missing: {0}")]
    MissingPart(&'static str),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Extraction panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config = ReadtimeError::Config(ConfigError::InvalidWpm("-5".to_string()));
        assert_eq!(config.exit_code(), 2);

        let missing = ReadtimeError::PathNotFound {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(missing.exit_code(), 1);
        assert!(missing.to_string().contains("/nope"));
    }

    #[test]
    fn test_extraction_error_display() {
        let err = ExtractionError::MissingPart("word/document.xml");
        assert_eq!(err.to_string(), "Document part missing: word/document.xml");

        let err = ExtractionError::Timeout(Duration::from_secs(3));
        assert!(err.to_string().contains("3s"));
    }
}
