use crate::config::{OutputFormat, RunConfig};
use crate::error::{ExtractionError, ReadtimeError};
use crate::extract::TextExtractor;
use crate::stats::{collect_file_stats, format_duration, FileStats};
use chrono::{DateTime, Utc};
use crossterm::style::Stylize;
use futures_util::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sums over every processed document.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Totals {
    pub documents: usize,
    pub words: u64,
    pub pages: u64,
    /// Sum of the per-document rounded minutes.
    pub reading_minutes: u64,
    pub reading_time: String,
}

impl Totals {
    pub fn from_stats(files: &[FileStats]) -> Self {
        // saturating: a tiny --wpm pins each file's minutes at u64::MAX
        let reading_minutes = saturating_sum(files.iter().map(|f| f.reading_minutes));
        Self {
            documents: files.len(),
            words: saturating_sum(files.iter().map(|f| f.words)),
            pages: saturating_sum(files.iter().map(|f| f.pages)),
            reading_minutes,
            reading_time: format_duration(reading_minutes),
        }
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

#[derive(Debug, Clone)]
pub struct Report {
    pub files: Vec<FileStats>,
    pub totals: Totals,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    words_per_minute: f64,
    files: &'a [FileStats],
    totals: &'a Totals,
}

impl Report {
    /// Order rows and compute totals. With `sort_by_time`, rows are ordered by
    /// descending reading time; equal times keep their input order.
    pub fn build(mut files: Vec<FileStats>, sort_by_time: bool) -> Self {
        if sort_by_time && files.len() > 1 {
            files.sort_by(|a, b| b.reading_minutes.cmp(&a.reading_minutes));
        }
        let totals = Totals::from_stats(&files);
        Self { files, totals }
    }

    pub fn render(&self, config: &RunConfig, styled: bool) -> Result<String, ReadtimeError> {
        match config.output {
            OutputFormat::Table => Ok(self.render_table(config.show_words, styled)),
            OutputFormat::Json => self.render_json(config.speed.words_per_minute()),
        }
    }

    pub fn render_json(&self, words_per_minute: f64) -> Result<String, ReadtimeError> {
        let report = JsonReport {
            generated_at: Utc::now(),
            words_per_minute,
            files: &self.files,
            totals: &self.totals,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn render_table(&self, show_words: bool, styled: bool) -> String {
        let mut headers = vec!["#", "File", "Format"];
        if show_words {
            headers.push("Words");
        }
        headers.extend(["Pages", "Reading Time"]);
        // name and format columns are left-aligned, the rest are numeric
        let left_aligned = 3;

        let rows: Vec<Vec<String>> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let mut row = vec![(i + 1).to_string(), file.name.clone(), file.format.clone()];
                if show_words {
                    row.push(group_thousands(file.words));
                }
                row.push(group_thousands(file.pages));
                row.push(file.reading_time.clone());
                row
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let pad = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, &width))| {
                    if col > 0 && col < left_aligned {
                        format!("{:<width$}", cell, width = width)
                    } else {
                        format!("{:>width$}", cell, width = width)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let header = pad(&header_cells);
        let rule = "-".repeat(header.chars().count().max(widths.iter().sum::<usize>()));

        let mut out = String::new();
        if styled {
            out.push_str(&format!("{}\n", header.as_str().bold()));
        } else {
            out.push_str(&header);
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        for row in &rows {
            out.push_str(&pad(row));
            out.push('\n');
        }

        if self.files.len() > 1 {
            out.push_str(&rule);
            out.push('\n');
            out.push_str(&self.render_summary(show_words));
        }
        out
    }

    fn render_summary(&self, show_words: bool) -> String {
        let mut lines = vec![(
            "Documents:",
            group_thousands(self.totals.documents as u64),
        )];
        if show_words {
            lines.push(("Total words:", group_thousands(self.totals.words)));
        }
        lines.push(("Total pages:", group_thousands(self.totals.pages)));
        lines.push(("Total reading time:", self.totals.reading_time.clone()));

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        lines
            .iter()
            .map(|(label, value)| format!("{:<width$} {}\n", label, value, width = label_width))
            .collect()
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Measure every file concurrently, at most `config.jobs` at a time.
///
/// Results come back in the order of `files`. A file that fails, panics or
/// times out is reported as a zero-valued row; it never aborts the batch.
pub async fn collect_all(
    files: Vec<PathBuf>,
    config: &RunConfig,
    extractor: Arc<dyn TextExtractor>,
    progress: &ProgressBar,
) -> Vec<FileStats> {
    info!(
        "Measuring {} documents with up to {} concurrent jobs",
        files.len(),
        config.jobs
    );

    stream::iter(files)
        .map(|path| collect_one(path, config, Arc::clone(&extractor)))
        .buffered(config.jobs.max(1))
        .inspect(|stats| {
            progress.inc(1);
            progress.set_message(stats.name.clone());
        })
        .collect::<Vec<_>>()
        .await
}

async fn collect_one(
    path: PathBuf,
    config: &RunConfig,
    extractor: Arc<dyn TextExtractor>,
) -> FileStats {
    let speed = config.speed;
    let task_path = path.clone();
    let task = tokio::task::spawn_blocking(move || {
        collect_file_stats(&task_path, &speed, extractor.as_ref())
    });

    let joined = match config.timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                let error = ExtractionError::Timeout(limit);
                warn!("Giving up on {}: {}", path.display(), error);
                return FileStats::unreadable(&path, &error);
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|e| {
        let error = ExtractionError::Panicked(e.to_string());
        warn!("Extraction task for {} failed: {}", path.display(), error);
        FileStats::unreadable(&path, &error)
    })
}

/// Collect, order and total in one step.
pub async fn build_report(
    files: Vec<PathBuf>,
    config: &RunConfig,
    extractor: Arc<dyn TextExtractor>,
    progress: &ProgressBar,
) -> Report {
    let stats = collect_all(files, config, extractor, progress).await;
    let unreadable = stats.iter().filter(|s| s.is_unreadable()).count();
    if unreadable > 0 {
        debug!("{} documents could not be read", unreadable);
    }
    Report::build(stats, config.sort_by_time)
}
