//! Preference store.
//!
//! Persists the sound toggle and the applied custom timings as a flat TOML
//! record. Failures never reach the engine: a missing or unreadable file
//! yields defaults and a failed write is logged and dropped.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::{CustomTimings, Preferences};

/// On-disk shape. Missing fields take the defaults of [`Preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct StoredPreferences {
    sound_enabled: bool,
    inhale: u32,
    hold1: u32,
    exhale: u32,
    hold2: u32,
}

impl Default for StoredPreferences {
    fn default() -> Self {
        Preferences::default().into()
    }
}

impl From<Preferences> for StoredPreferences {
    fn from(p: Preferences) -> Self {
        Self {
            sound_enabled: p.sound_enabled,
            inhale: p.custom_timings.inhale,
            hold1: p.custom_timings.hold1,
            exhale: p.custom_timings.exhale,
            hold2: p.custom_timings.hold2,
        }
    }
}

impl From<StoredPreferences> for Preferences {
    fn from(s: StoredPreferences) -> Self {
        Self {
            sound_enabled: s.sound_enabled,
            custom_timings: CustomTimings::new(s.inhale, s.hold1, s.exhale, s.hold2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Preferences {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences, using defaults");
                return Preferences::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return Preferences::default();
            }
        };
        match toml::from_str::<StoredPreferences>(&contents) {
            Ok(stored) => stored.into(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse preferences");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) {
        if let Err(e) = self.try_save(preferences) {
            warn!(path = %self.path.display(), error = %e, "failed to save preferences");
        }
    }

    fn try_save(&self, preferences: &Preferences) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&StoredPreferences::from(*preferences))?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
