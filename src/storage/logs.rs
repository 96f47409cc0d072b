//! Log storage: the `logs` table behind the repository.

use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::model::{Log, LogKind, LogType};
use crate::repository::LogStore;

use super::{Result, Storage, StorageError};

impl LogStore for Storage {
    /// Loads every log in insertion order.
    fn get_all(&self) -> Result<Vec<Log>> {
        let conn = self.open_db()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, title, content, created_at, updated_at, pinned, details
             FROM logs ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RawLog {
                id: row.get(0)?,
                log_type: row.get(1)?,
                title: row.get(2)?,
                content: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
                pinned: row.get(6)?,
                details: row.get(7)?,
            })
        })?;

        let mut logs = Vec::new();
        for raw in rows {
            logs.push(raw?.into_log()?);
        }
        Ok(logs)
    }

    /// Appends a log after every existing one.
    fn insert(&self, log: &Log) -> Result<()> {
        let conn = self.open_db()?;
        let position = next_position(&conn)?;
        conn.execute(
            "INSERT INTO logs (id, type, title, content, created_at, updated_at, pinned, position, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                log.id.to_string(),
                log.log_type().as_str(),
                log.title,
                log.content,
                log.created_at.to_string(),
                log.updated_at.to_string(),
                log.pinned,
                position,
                serde_json::to_string(&log.kind)?,
            ],
        )?;
        Ok(())
    }

    /// Rewrites every mutable column of an existing log.
    fn update(&self, log: &Log) -> Result<()> {
        let conn = self.open_db()?;
        let rows = conn.execute(
            "UPDATE logs
             SET title = ?1, content = ?2, updated_at = ?3, pinned = ?4, details = ?5
             WHERE id = ?6",
            rusqlite::params![
                log.title,
                log.content,
                log.updated_at.to_string(),
                log.pinned,
                serde_json::to_string(&log.kind)?,
                log.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::Corrupt(format!(
                "log {} is not stored",
                log.id
            )));
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.open_db()?;
        conn.execute("DELETE FROM logs WHERE id = ?1", [id.to_string()])?;
        Ok(())
    }
}

fn next_position(conn: &Connection) -> Result<i64> {
    let max: Option<i64> = conn
        .query_row("SELECT MAX(position) FROM logs", [], |row| row.get(0))
        .optional()?
        .flatten();
    Ok(max.map_or(0, |p| p + 1))
}

/// One row of the `logs` table, before validation.
struct RawLog {
    id: String,
    log_type: String,
    title: Option<String>,
    content: String,
    created_at: String,
    updated_at: String,
    pinned: bool,
    details: String,
}

impl RawLog {
    fn into_log(self) -> Result<Log> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| StorageError::Corrupt(format!("invalid log id: {e}")))?;
        let created_at = self
            .created_at
            .parse::<jiff::Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid created_at for {id}: {e}")))?;
        let updated_at = self
            .updated_at
            .parse::<jiff::Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid updated_at for {id}: {e}")))?;
        let log_type = self
            .log_type
            .parse::<LogType>()
            .map_err(|e| StorageError::Corrupt(format!("log {id}: {e}")))?;
        let kind: LogKind = serde_json::from_str(&self.details)?;
        if kind.log_type() != log_type {
            return Err(StorageError::Corrupt(format!(
                "log {id} is stored as {log_type} but its details describe a {}",
                kind.log_type()
            )));
        }

        Ok(Log {
            id,
            title: self.title,
            content: self.content,
            created_at,
            updated_at,
            pinned: self.pinned,
            kind,
        })
    }
}
