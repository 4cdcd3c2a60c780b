use crate::config::ReadingSpeedConfig;
use crate::error::ExtractionError;
use crate::extract::{Extraction, TextExtractor};
use crate::format::{format_label, SupportedFormat};
use crate::metrics::{count_words, estimate_pages};
use serde::Serialize;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, warn};

/// Reading estimate for one document.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub name: String,
    pub format: String,
    pub words: u64,
    pub pages: u64,
    pub reading_minutes: u64,
    pub reading_time: String,
    /// Why the document was counted as empty, if extraction failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl FileStats {
    pub fn new(path: &Path, words: u64, pages: u64, speed: &ReadingSpeedConfig) -> Self {
        let reading_minutes = reading_minutes(words, speed);
        Self {
            name: file_name(path),
            format: format_label(path),
            words,
            pages,
            reading_minutes,
            reading_time: format_duration(reading_minutes),
            extraction_error: None,
        }
    }

    /// Zero-valued row for a document that could not be read.
    pub fn unreadable(path: &Path, error: &ExtractionError) -> Self {
        Self {
            name: file_name(path),
            format: format_label(path),
            words: 0,
            pages: 0,
            reading_minutes: 0,
            reading_time: format_duration(0),
            extraction_error: Some(error.to_string()),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.reading_minutes.saturating_mul(60))
    }

    pub fn is_unreadable(&self) -> bool {
        self.extraction_error.is_some()
    }
}

/// `ceil(words / wpm)`.
pub fn reading_minutes(words: u64, speed: &ReadingSpeedConfig) -> u64 {
    (words as f64 / speed.words_per_minute()).ceil() as u64
}

/// `HH:MM:00`; hours are not wrapped at 24.
pub fn format_duration(minutes: u64) -> String {
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

thread_local! {
    static EXTRACTING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PANIC_HOOK: Once = Once::new();

/// Route panics raised while a format library runs to the debug log instead
/// of stderr. Panics anywhere else still reach the previous hook.
fn install_quiet_panic_hook() {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if EXTRACTING.with(Cell::get) {
                debug!("Extraction panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f` with panics caught and kept off stderr.
fn catch_extraction_panic<T>(
    f: impl FnOnce() -> Result<T, ExtractionError>,
) -> Result<T, ExtractionError> {
    install_quiet_panic_hook();
    EXTRACTING.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    EXTRACTING.with(|flag| flag.set(false));
    result.unwrap_or_else(|payload| Err(ExtractionError::Panicked(panic_message(payload))))
}

/// Extract and measure one file.
///
/// Never fails: any extraction error, including a panic inside a format
/// library, yields a zero-valued row so the rest of the batch carries on.
pub fn collect_file_stats<E>(path: &Path, speed: &ReadingSpeedConfig, extractor: &E) -> FileStats
where
    E: TextExtractor + ?Sized,
{
    let Some(format) = SupportedFormat::from_path(path) else {
        let error = ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "unsupported file extension",
        ));
        warn!("Skipping {}: {}", path.display(), error);
        return FileStats::unreadable(path, &error);
    };

    let extracted = catch_extraction_panic(|| extractor.extract(path, format));

    match extracted {
        Ok(extraction) => stats_from_extraction(path, &extraction, speed),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            FileStats::unreadable(path, &e)
        }
    }
}

pub fn stats_from_extraction(
    path: &Path,
    extraction: &Extraction,
    speed: &ReadingSpeedConfig,
) -> FileStats {
    let words = count_words(&extraction.text);
    let pages = estimate_pages(&extraction.text, extraction.native_pages);
    debug!("{}: {} words, {} pages", path.display(), words, pages);
    FileStats::new(path, words, pages, speed)
}

pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
