use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WPM: f64 = 200.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid --wpm value '{0}': must be a positive number")]
    InvalidWpm(String),

    #[error("Invalid --jobs value '{0}': must be a positive integer")]
    InvalidJobs(String),

    #[error("Invalid --timeout value '{0}': must be a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Invalid log level: {0}. Valid levels are: error, warn, info, debug, trace")]
    InvalidLogLevel(String),

    #[error("Settings file error: {0}")]
    Settings(String),
}

/// Words-per-minute rate, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingSpeedConfig {
    words_per_minute: f64,
}

impl ReadingSpeedConfig {
    pub fn new(words_per_minute: f64) -> Result<Self, ConfigError> {
        if !words_per_minute.is_finite() || words_per_minute <= 0.0 {
            return Err(ConfigError::InvalidWpm(words_per_minute.to_string()));
        }
        Ok(Self { words_per_minute })
    }

    /// Parse a user-supplied rate such as `"250"` or `"187.5"`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidWpm(raw.to_string()))?;
        Self::new(value).map_err(|_| ConfigError::InvalidWpm(raw.to_string()))
    }

    pub fn words_per_minute(&self) -> f64 {
        self.words_per_minute
    }
}

impl Default for ReadingSpeedConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WPM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Everything a run needs, built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub speed: ReadingSpeedConfig,
    pub sort_by_time: bool,
    pub show_words: bool,
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub output: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            speed: ReadingSpeedConfig::default(),
            sort_by_time: false,
            show_words: false,
            jobs: default_jobs(),
            timeout: None,
            output: OutputFormat::Table,
        }
    }
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

pub fn parse_jobs(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(jobs) if jobs > 0 => Ok(jobs),
        _ => Err(ConfigError::InvalidJobs(raw.to_string())),
    }
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(Duration::from_secs_f64(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
