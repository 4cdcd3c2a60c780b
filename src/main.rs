use clap::{Arg, ArgAction, ArgMatches, Command};
use crossterm::tty::IsTty;
use indicatif::{ProgressBar, ProgressStyle};
use readtime::config::{
    parse_jobs, parse_timeout, ConfigError, OutputFormat, ReadingSpeedConfig, RunConfig,
};
use readtime::error::ReadtimeError;
use readtime::extract::FormatExtractor;
use readtime::format::SupportedFormat;
use readtime::utilities::{load_settings, save_settings, Settings};
use std::io::{stderr, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("readtime")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Estimates reading time for the documents in a directory")
        .after_help(format!(
            "Supported formats: {}",
            SupportedFormat::supported_list()
        ))
        .arg(
            Arg::new("path")
                .num_args(1)
                .default_value(".")
                .help("A document or a directory of documents"),
        )
        .arg(
            Arg::new("wpm")
                .long("wpm")
                .num_args(1)
                .allow_hyphen_values(true)
                .help("Reading speed in words per minute [default: 200, or saved preference]"),
        )
        .arg(
            Arg::new("timesort")
                .long("timesort")
                .action(ArgAction::SetTrue)
                .overrides_with("no_timesort")
                .help("Sort documents by reading time, longest first"),
        )
        .arg(
            Arg::new("no_timesort")
                .long("no-timesort")
                .action(ArgAction::SetTrue)
                .overrides_with("timesort")
                .help("Keep directory order even if sorting was saved as a default"),
        )
        .arg(
            Arg::new("words")
                .long("words")
                .action(ArgAction::SetTrue)
                .overrides_with("no_words")
                .help("Show the word count column and total"),
        )
        .arg(
            Arg::new("no_words")
                .long("no-words")
                .action(ArgAction::SetTrue)
                .overrides_with("words")
                .help("Hide the word count column even if it was saved as a default"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON instead of a table"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .num_args(1)
                .help("Maximum number of documents processed at once"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .num_args(1)
                .help("Give up on a document after this many seconds"),
        )
        .arg(
            Arg::new("save_defaults")
                .long("save-defaults")
                .action(ArgAction::SetTrue)
                .help("Remember --wpm, --timesort and --words for later runs"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging (equivalent to --log-level debug)"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .num_args(1)
                .value_name("LEVEL")
                .help("Set log level (error, warn, info, debug, trace)"),
        )
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(matches: &ArgMatches) -> Result<(), ConfigError> {
    let log_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        matches
            .get_one::<String>("log_level")
            .map(String::as_str)
            .unwrap_or("warn")
    };

    match log_level.to_lowercase().as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => {}
        _ => return Err(ConfigError::InvalidLogLevel(log_level.to_string())),
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|_| ConfigError::InvalidLogLevel(log_level.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(false)
        .init();

    debug!("Logging initialized with level: {}", log_level);
    Ok(())
}

/// `--flag` / `--no-flag` on the command line, else the saved value, else off.
fn flag_or_saved(matches: &ArgMatches, on: &str, off: &str, saved: Option<bool>) -> bool {
    if matches.get_flag(on) {
        true
    } else if matches.get_flag(off) {
        false
    } else {
        saved.unwrap_or(false)
    }
}

/// Priority: command line > saved preferences > defaults.
fn build_config(matches: &ArgMatches, saved: &Settings) -> Result<RunConfig, ConfigError> {
    let speed = match matches.get_one::<String>("wpm") {
        Some(raw) => ReadingSpeedConfig::parse(raw)?,
        None => match saved.wpm {
            Some(wpm) => ReadingSpeedConfig::new(wpm)?,
            None => ReadingSpeedConfig::default(),
        },
    };

    let mut config = RunConfig {
        speed,
        sort_by_time: flag_or_saved(matches, "timesort", "no_timesort", saved.timesort),
        show_words: flag_or_saved(matches, "words", "no_words", saved.words),
        ..RunConfig::default()
    };
    if let Some(raw) = matches.get_one::<String>("jobs") {
        config.jobs = parse_jobs(raw)?;
    }
    if let Some(raw) = matches.get_one::<String>("timeout") {
        config.timeout = Some(parse_timeout(raw)?);
    }
    if matches.get_flag("json") {
        config.output = OutputFormat::Json;
    }
    Ok(config)
}

fn spinner() -> ProgressBar {
    if !stderr().is_tty() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{pos}/{len}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Reading documents");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn run(matches: &ArgMatches) -> Result<(), ReadtimeError> {
    init_logging(matches)?;

    let saved = load_settings();
    let config = build_config(matches, &saved)?;
    debug!("Effective configuration: {:?}", config);

    if matches.get_flag("save_defaults") {
        let path = save_settings(&Settings {
            wpm: Some(config.speed.words_per_minute()),
            timesort: Some(config.sort_by_time),
            words: Some(config.show_words),
        })?;
        info!("Saved preferences to {}", path.display());
    }

    let path = PathBuf::from(
        matches
            .get_one::<String>("path")
            .map(String::as_str)
            .unwrap_or("."),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let progress = spinner();
    let outcome = runtime.block_on(readtime::measure(
        &path,
        &config,
        Arc::new(FormatExtractor),
        &progress,
    ));
    progress.finish_and_clear();
    // a timed-out extraction may still be running; don't wait for it
    runtime.shutdown_background();

    let mut out = stdout();
    match outcome? {
        None => {
            writeln!(
                out,
                "No supported documents found in {} (looking for: {})",
                path.display(),
                SupportedFormat::supported_list()
            )?;
        }
        Some(report) => {
            let styled = config.output == OutputFormat::Table && out.is_tty();
            write!(out, "{}", report.render(&config, styled)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    let code = match run(&matches) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
