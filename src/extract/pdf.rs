use super::Extraction;
use crate::error::ExtractionError;
use std::path::Path;
use tracing::debug;

/// Text via `pdf-extract`, page count from the page tree via `lopdf`.
pub fn extract(path: &Path) -> Result<Extraction, ExtractionError> {
    let bytes = std::fs::read(path)?;

    let document =
        lopdf::Document::load_mem(&bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let pages = document.get_pages().len() as u64;
    debug!("{} has {} pages", path.display(), pages);

    let text =
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(Extraction::with_pages(text, Some(pages)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4\nthis is not really a pdf").unwrap();

        assert!(matches!(extract(&path), Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_missing_pdf_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            extract(&dir.path().join("absent.pdf")),
            Err(ExtractionError::Io(_))
        ));
    }
}
