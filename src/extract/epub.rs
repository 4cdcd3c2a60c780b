use super::html::html_to_text;
use super::Extraction;
use crate::error::ExtractionError;
use epub::doc::EpubDoc;
use std::path::Path;
use tracing::{debug, warn};

/// Concatenated text of every spine document, in reading order.
pub fn extract(path: &Path) -> Result<Extraction, ExtractionError> {
    if !path.is_file() {
        return Err(ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a readable file", path.display()),
        )));
    }

    let mut doc = EpubDoc::new(path).map_err(|e| ExtractionError::Epub(e.to_string()))?;
    let spine = doc.spine.clone();
    debug!("{} has {} spine items", path.display(), spine.len());
    if spine.is_empty() {
        return Err(ExtractionError::Epub("book has no spine".to_string()));
    }

    let mut text = String::new();
    for id in &spine {
        match doc.get_resource_str(id) {
            Ok(chapter) => {
                text.push_str(&html_to_text(&chapter));
                text.push('\n');
            }
            Err(e) => warn!("Skipping unreadable chapter {} in {}: {}", id, path.display(), e),
        }
    }
    Ok(Extraction::text(text))
}
