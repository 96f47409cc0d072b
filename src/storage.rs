//! Local persistence for logs and settings.
//!
//! Everything lives under one root directory:
//!
//! ```text
//! <root>/
//!   logbook.sqlite   # Log table
//!   settings.toml    # User settings (theme, ...)
//!   config.toml      # Application config, see `config`
//!   logs/            # Rolling trace output
//! ```

mod logs;
mod settings;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;

pub use settings::{SettingKey, SettingsStore, Theme};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },
}

pub type Result<T> = core::result::Result<T, StorageError>;

const DB_FILE: &str = "logbook.sqlite";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS logs (
        id          TEXT PRIMARY KEY,
        type        TEXT NOT NULL,
        title       TEXT,
        content     TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        pinned      INTEGER NOT NULL DEFAULT 0,
        position    INTEGER NOT NULL,
        details     TEXT NOT NULL
    );
";

/// Local file-based storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory and the log table are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let storage = Self { root };
        storage.open_db()?;
        Ok(storage)
    }

    #[cfg(test)]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// The settings store kept alongside the logs.
    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.root.join("settings.toml"))
    }

    /// Opens the database, creating the schema on first use.
    fn open_db(&self) -> Result<Connection> {
        let conn = Connection::open(self.root.join(DB_FILE))?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}
