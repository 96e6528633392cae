use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Difficulty;
use crate::error::SettingsError;

const APP_DIR_NAME: &str = "neon-snake";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Persisted preferences and statistics.
///
/// Field names double as the store's keys; unknown keys are ignored and
/// missing ones fall back to defaults.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub high_score: u32,
    pub games_played: u32,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    /// 0..=100
    pub sound_volume: u8,
    /// 0..=100
    pub vibration_intensity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            high_score: 0,
            games_played: 0,
            sound_enabled: true,
            vibration_enabled: true,
            sound_volume: 80,
            vibration_intensity: 70,
        }
    }
}

impl Settings {
    /// Counts a finished game and keeps the best score.
    ///
    /// Returns `true` when `final_score` is a new high score.
    pub fn record_game(&mut self, final_score: u32) -> bool {
        self.games_played = self.games_played.saturating_add(1);
        if final_score > self.high_score {
            self.high_score = final_score;
            return true;
        }
        false
    }

    /// Clears statistics, keeping preferences. Called by the `--reset-stats`
    /// flag of the binary.
    pub fn reset_stats(&mut self) {
        self.high_score = 0;
        self.games_played = 0;
    }
}

/// Key-value store holding [`Settings`].
pub trait SettingsStore {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings kept as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform-correct data location.
    #[must_use]
    pub fn open_default() -> Self {
        Self::new(default_settings_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    /// Returns defaults when the file does not exist yet (first run) and an
    /// error when it exists but cannot be read or parsed.
    fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the document, creating parent directories when needed.
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Volatile store for tests and headless runs. Embedders that persist
/// settings elsewhere seed it with `new` and read it back after a session;
/// the terminal binary uses [`JsonSettingsStore`].
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.settings)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self.settings = *settings;
        Ok(())
    }
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn default_settings_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    base
}
