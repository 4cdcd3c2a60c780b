//! Reading-time estimates for a directory of documents.
//!
//! The pipeline is: [`scanner::scan`] finds the documents,
//! [`report::collect_all`] extracts and measures them concurrently, and
//! [`report::Report`] orders, totals and renders the result.

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod metrics;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod utilities;

use crate::config::RunConfig;
use crate::error::ReadtimeError;
use crate::extract::TextExtractor;
use crate::report::Report;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;

/// Scan `path` and measure everything found.
///
/// Returns `Ok(None)` when there are no supported documents to report on.
pub async fn measure(
    path: &Path,
    config: &RunConfig,
    extractor: Arc<dyn TextExtractor>,
    progress: &ProgressBar,
) -> Result<Option<Report>, ReadtimeError> {
    let files = scanner::scan(path)?;
    if files.is_empty() {
        return Ok(None);
    }
    progress.set_length(files.len() as u64);
    let report = report::build_report(files, config, extractor, progress).await;
    Ok(Some(report))
}
