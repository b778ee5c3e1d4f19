use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::Level;

use crate::config::LoggingConfig;

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("procflow")
        .join("procflow.log")
}

pub fn resolve_log_path(config: &LoggingConfig) -> PathBuf {
    if config.file.is_empty() {
        default_log_path()
    } else {
        PathBuf::from(&config.file)
    }
}

pub fn parse_level(level: &str) -> Level {
    Level::from_str(level).unwrap_or(Level::INFO)
}

/// Installs the global subscriber writing to a file; the terminal belongs to the UI.
pub fn init(config: &LoggingConfig) -> Result<PathBuf> {
    let path = resolve_log_path(config);
    ensure_parent_dir(&path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let writer = Mutex::new(file);
    let level = parse_level(&config.level);

    let result = if config.format.eq_ignore_ascii_case("json") {
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .json()
            .with_max_level(level)
            .with_writer(writer)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(level)
            .with_writer(writer)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    tracing::info!(path = %path.display(), %level, "logging initialized");
    Ok(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
