use crate::config::ConfigError;
use dirs_next::home_dir;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SETTINGS_FILE: &str = ".readtime_settings";

/// Defaults remembered between runs. Command-line flags take priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub wpm: Option<f64>,
    pub timesort: Option<bool>,
    pub words: Option<bool>,
}

pub fn settings_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_FILE))
}

/// Load settings from the user's home directory
pub fn load_settings() -> Settings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => Settings::default(),
    }
}

/// Save the user's settings to a file in their home directory
pub fn save_settings(settings: &Settings) -> Result<PathBuf, ConfigError> {
    let path = settings_path()
        .ok_or_else(|| ConfigError::Settings("home directory not found".to_string()))?;
    save_settings_to(&path, settings)?;
    Ok(path)
}

pub fn load_settings_from(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if path.exists() {
                warn!("Failed to read settings file {}: {}", path.display(), e);
            }
            return Settings::default();
        }
    };
    debug!("Loaded settings from {}", path.display());

    let mut settings = Settings::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(value) = line.strip_prefix("wpm=") {
            settings.wpm = value.trim().parse::<f64>().ok().filter(|v| *v > 0.0);
        } else if let Some(value) = line.strip_prefix("timesort=") {
            settings.timesort = value.trim().parse::<bool>().ok();
        } else if let Some(value) = line.strip_prefix("words=") {
            settings.words = value.trim().parse::<bool>().ok();
        } else {
            warn!("Ignoring unknown settings line: {}", line);
        }
    }
    settings
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let write = || -> std::io::Result<()> {
        let mut file = File::create(path)?;
        if let Some(wpm) = settings.wpm {
            writeln!(file, "wpm={}", wpm)?;
        }
        if let Some(timesort) = settings.timesort {
            writeln!(file, "timesort={}", timesort)?;
        }
        if let Some(words) = settings.words {
            writeln!(file, "words={}", words)?;
        }
        Ok(())
    };
    write().map_err(|e| ConfigError::Settings(format!("{}: {}", path.display(), e)))
}
