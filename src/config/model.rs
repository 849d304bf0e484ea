//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_EXERCISE_ID;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Exercise selected at startup.
    #[serde(default = "default_exercise")]
    pub default_exercise: String,
    #[serde(default = "default_true")]
    pub show_help: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_exercise: default_exercise(),
            show_help: true,
        }
    }
}

/// Diagnostic log settings. The terminal belongs to the UI, so logs go to a
/// daily file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// `tracing` filter directive, e.g. `info` or `serenitybreath=debug`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_exercise() -> String {
    DEFAULT_EXERCISE_ID.to_string()
}
fn default_log_dir() -> String {
    "~/.local/share/serenitybreath/logs".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
