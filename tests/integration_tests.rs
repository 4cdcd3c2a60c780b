use indicatif::ProgressBar;
use readtime::config::{ReadingSpeedConfig, RunConfig};
use readtime::error::{ExtractionError, ReadtimeError};
use readtime::extract::{Extraction, FormatExtractor, TextExtractor};
use readtime::format::SupportedFormat;
use readtime::measure;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn config_with_wpm(wpm: f64) -> RunConfig {
    RunConfig {
        speed: ReadingSpeedConfig::new(wpm).unwrap(),
        ..RunConfig::default()
    }
}

fn words(n: usize) -> String {
    vec!["lorem"; n].join(" ")
}

/// Runs the binary with an isolated home directory so saved preferences
/// on the host machine cannot leak in.
fn readtime_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_readtime"));
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[tokio::test]
async fn test_single_text_file_at_200_wpm() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("essay.txt"), words(400)).unwrap();

    let report = measure(
        dir.path(),
        &config_with_wpm(200.0),
        Arc::new(FormatExtractor),
        &ProgressBar::hidden(),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].words, 400);
    assert_eq!(report.files[0].reading_time, "00:02:00");
}

#[tokio::test]
async fn test_two_files_totals_at_100_wpm() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), words(100)).unwrap();
    fs::write(dir.path().join("b.md"), words(500)).unwrap();

    let report = measure(
        dir.path(),
        &config_with_wpm(100.0),
        Arc::new(FormatExtractor),
        &ProgressBar::hidden(),
    )
    .await
    .unwrap()
    .unwrap();

    let times: Vec<&str> = report.files.iter().map(|f| f.reading_time.as_str()).collect();
    assert_eq!(times, vec!["00:01:00", "00:05:00"]);
    assert_eq!(report.totals.reading_minutes, 6);
    assert_eq!(report.totals.reading_time, "00:06:00");
    assert_eq!(report.totals.words, 600);

    let table = report.render_table(false, false);
    assert!(table.contains("Documents:"));
    assert!(table.contains("00:06:00"));
}

#[tokio::test]
async fn test_corrupt_pdf_does_not_affect_other_rows() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.pdf"), b"%PDF-1.7\n\x00\x01garbage").unwrap();
    fs::write(dir.path().join("fine.txt"), words(250)).unwrap();

    let report = measure(
        dir.path(),
        &config_with_wpm(250.0),
        Arc::new(FormatExtractor),
        &ProgressBar::hidden(),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(report.files.len(), 2);
    let broken = &report.files[0];
    assert_eq!(broken.name, "broken.pdf");
    assert_eq!(broken.format, "PDF");
    assert_eq!((broken.words, broken.pages), (0, 0));
    assert_eq!(broken.reading_time, "00:00:00");
    assert!(broken.is_unreadable());

    let fine = &report.files[1];
    assert_eq!(fine.words, 250);
    assert_eq!(fine.reading_time, "00:01:00");
}

#[tokio::test]
async fn test_empty_directory_reports_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("picture.png"), b"\x89PNG").unwrap();

    let report = measure(
        dir.path(),
        &RunConfig::default(),
        Arc::new(FormatExtractor),
        &ProgressBar::hidden(),
    )
    .await
    .unwrap();
    assert!(report.is_none());
}

#[tokio::test]
async fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let result = measure(
        &dir.path().join("absent"),
        &RunConfig::default(),
        Arc::new(FormatExtractor),
        &ProgressBar::hidden(),
    )
    .await;
    assert!(matches!(result, Err(ReadtimeError::PathNotFound { .. })));
}

struct SlowExtractor;

impl TextExtractor for SlowExtractor {
    fn extract(&self, path: &Path, _: SupportedFormat) -> Result<Extraction, ExtractionError> {
        if path.file_name().is_some_and(|name| name == "slow.txt") {
            std::thread::sleep(Duration::from_secs(2));
        }
        Ok(Extraction::text("quick words"))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_turns_slow_file_into_zero_row() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fast.txt"), "x").unwrap();
    fs::write(dir.path().join("slow.txt"), "x").unwrap();

    let config = RunConfig {
        timeout: Some(Duration::from_millis(100)),
        ..RunConfig::default()
    };
    let report = measure(dir.path(), &config, Arc::new(SlowExtractor), &ProgressBar::hidden())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.files[0].name, "fast.txt");
    assert_eq!(report.files[0].words, 2);
    assert_eq!(report.files[1].name, "slow.txt");
    assert_eq!(report.files[1].words, 0);
    assert!(report.files[1]
        .extraction_error
        .as_deref()
        .unwrap()
        .contains("timed out"));
}

#[tokio::test]
async fn test_timesort_with_bounded_jobs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), words(100)).unwrap();
    fs::write(dir.path().join("b.txt"), words(1000)).unwrap();
    fs::write(dir.path().join("c.txt"), words(500)).unwrap();
    fs::write(dir.path().join("d.txt"), words(1000)).unwrap();

    let config = RunConfig {
        speed: ReadingSpeedConfig::new(100.0).unwrap(),
        sort_by_time: true,
        jobs: 1,
        ..RunConfig::default()
    };
    let report = measure(dir.path(), &config, Arc::new(FormatExtractor), &ProgressBar::hidden())
        .await
        .unwrap()
        .unwrap();

    let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b.txt", "d.txt", "c.txt", "a.txt"]);
}

#[test]
fn test_cli_prints_table() {
    let home = tempdir().unwrap();
    let docs = tempdir().unwrap();
    fs::write(docs.path().join("essay.txt"), words(400)).unwrap();

    let output = readtime_cmd(home.path())
        .arg(docs.path())
        .args(["--wpm", "200", "--words"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("essay.txt"));
    assert!(stdout.contains("TXT"));
    assert!(stdout.contains("400"));
    assert!(stdout.contains("00:02:00"));
}

#[test]
fn test_cli_rejects_negative_wpm() {
    let home = tempdir().unwrap();
    let docs = tempdir().unwrap();
    fs::write(docs.path().join("essay.txt"), words(400)).unwrap();

    let output = readtime_cmd(home.path())
        .args(["--wpm", "-5"])
        .arg(docs.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--wpm"));
}

#[test]
fn test_cli_empty_directory_exits_cleanly() {
    let home = tempdir().unwrap();
    let docs = tempdir().unwrap();

    let output = readtime_cmd(home.path()).arg(docs.path()).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No supported documents found"));
}

#[test]
fn test_cli_help_exits_zero() {
    let home = tempdir().unwrap();
    let output = readtime_cmd(home.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--wpm"));
    assert!(stdout.contains("--timesort"));
}

#[test]
fn test_cli_saved_defaults_apply_to_later_runs() {
    let home = tempdir().unwrap();
    let docs = tempdir().unwrap();
    fs::write(docs.path().join("essay.txt"), words(400)).unwrap();

    let save = readtime_cmd(home.path())
        .args(["--wpm", "100", "--save-defaults"])
        .arg(docs.path())
        .output()
        .unwrap();
    assert!(save.status.success());
    assert!(home.path().join(".readtime_settings").exists());

    let later = readtime_cmd(home.path()).arg(docs.path()).output().unwrap();
    assert!(String::from_utf8_lossy(&later.stdout).contains("00:04:00"));
}

#[test]
fn test_cli_json_output() {
    let home = tempdir().unwrap();
    let docs = tempdir().unwrap();
    fs::write(docs.path().join("a.txt"), words(100)).unwrap();
    fs::write(docs.path().join("b.txt"), words(500)).unwrap();

    let output = readtime_cmd(home.path())
        .args(["--json", "--wpm", "100"])
        .arg(docs.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["totals"]["documents"], 2);
    assert_eq!(value["totals"]["reading_time"], "00:06:00");
}
