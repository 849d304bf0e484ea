//! Diagnostic logging to disk.
//!
//! When enabled, installs a `tracing` subscriber that writes to a daily log
//! file named `serenitybreath_<date>.log` in the configured log directory
//! (default: `~/.local/share/serenitybreath/logs/`). The terminal is owned by
//! the UI, so nothing is ever logged to stdout or stderr.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Expand a leading `~` to the home directory.
fn expand_home(dir: &str) -> PathBuf {
    match dir.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(dir)),
        None => PathBuf::from(dir),
    }
}

fn log_file_path(log_dir: &Path, date: chrono::NaiveDate) -> PathBuf {
    log_dir.join(format!("serenitybreath_{}.log", date.format("%Y-%m-%d")))
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging is disabled. `RUST_LOG` overrides the configured level.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let log_dir = expand_home(&config.log_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = log_file_path(&log_dir, chrono::Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(Some(path))
}
