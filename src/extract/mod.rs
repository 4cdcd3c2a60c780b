//! Text extraction, one strategy per supported format.
//!
//! Each submodule turns a file of its format into plain text and, where the
//! format records one, a native page count. Failures are returned to the
//! caller as [`ExtractionError`]; deciding what to do with them is the
//! collector's job.

pub mod epub;
pub mod html;
pub mod office;
pub mod pdf;
pub mod plain;
pub mod rtf;

use crate::error::ExtractionError;
use crate::format::SupportedFormat;
use std::path::Path;
use tracing::debug;

/// Plain text pulled from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub text: String,
    /// Page count recorded by the document itself, if the format has one.
    pub native_pages: Option<u64>,
}

impl Extraction {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            native_pages: None,
        }
    }

    pub fn with_pages(text: impl Into<String>, pages: Option<u64>) -> Self {
        Self {
            text: text.into(),
            native_pages: pages,
        }
    }
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path, format: SupportedFormat)
        -> Result<Extraction, ExtractionError>;
}

/// Default extractor backed by the per-format modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatExtractor;

impl TextExtractor for FormatExtractor {
    fn extract(
        &self,
        path: &Path,
        format: SupportedFormat,
    ) -> Result<Extraction, ExtractionError> {
        debug!("Extracting {:?} text from {}", format, path.display());
        match format {
            SupportedFormat::Pdf => pdf::extract(path),
            SupportedFormat::Txt => plain::extract(path),
            SupportedFormat::Md => plain::extract_markdown(path),
            SupportedFormat::Docx => office::extract_docx(path),
            SupportedFormat::Odt => office::extract_odt(path),
            SupportedFormat::Rtf => rtf::extract(path),
            SupportedFormat::Epub => epub::extract(path),
            SupportedFormat::Html => html::extract(path),
        }
    }
}

/// Read a whole file as text, replacing invalid UTF-8 sequences.
pub(crate) fn read_lossy(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
