pub mod model;
pub mod preferences;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use model::{AppConfig, LoggingConfig};
pub use preferences::PreferenceStore;

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("serenitybreath")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn preferences_path() -> PathBuf {
    config_dir().join("preferences.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
