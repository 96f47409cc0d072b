//! Settings storage: a small typed key-value file.
//!
//! A missing file is a valid store holding the defaults. Reset removes
//! the file rather than writing the defaults out.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use super::{Result, StorageError};

/// Color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// All user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub theme: Theme,
}

/// A settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Theme,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "theme" => Ok(Self::Theme),
            other => Err(StorageError::UnknownSetting(other.to_string())),
        }
    }
}

/// Settings persisted as TOML at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the settings, falling back to defaults when the file is missing.
    pub fn load(&self) -> Result<Settings> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&contents)?)
    }

    /// One setting's value, or every setting as a table when `key` is `None`.
    pub fn get(&self, key: Option<SettingKey>) -> Result<toml::Value> {
        let settings = self.load()?;
        match key {
            None => Ok(toml::Value::try_from(&settings)?),
            Some(SettingKey::Theme) => Ok(toml::Value::String(settings.theme.as_str().into())),
        }
    }

    /// Parses `value` for `key` and writes it.
    pub fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        match key {
            SettingKey::Theme => {
                settings.theme = match value.trim() {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    other => {
                        return Err(StorageError::InvalidSetting {
                            key: key.to_string(),
                            value: other.to_string(),
                        });
                    }
                };
            }
        }
        self.save(&settings)
    }

    /// Restores the defaults.
    ///
    /// Idempotent: does nothing if the file doesn't exist.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(settings)?)?;
        Ok(())
    }
}
