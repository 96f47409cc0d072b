//! The log repository: the canonical in-memory collection of logs.
//!
//! Mutations are synchronous and visible to the next read. When a
//! [`LogStore`] backend is attached, each mutation is written to it first
//! and only applied in memory once the write succeeds, so a failed write
//! leaves the collection exactly as it was.

use std::collections::BTreeMap;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Log, LogPatch, LogType, NewLog};
use crate::storage::StorageError;

/// Errors that can occur during repository mutations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("log {id} is a {from} and cannot become a {to}")]
    TypeChange {
        id: Uuid,
        from: LogType,
        to: LogType,
    },
}

pub type Result<T> = core::result::Result<T, RepositoryError>;

/// Durable backend the repository writes through to.
pub trait LogStore {
    /// Every stored log, in insertion order.
    fn get_all(&self) -> crate::storage::Result<Vec<Log>>;

    fn insert(&self, log: &Log) -> crate::storage::Result<()>;

    fn update(&self, log: &Log) -> crate::storage::Result<()>;

    fn delete(&self, id: Uuid) -> crate::storage::Result<()>;
}

/// Owns the logs. Passed explicitly to whatever needs it.
pub struct LogRepository {
    logs: Vec<Log>,
    store: Option<Box<dyn LogStore>>,
}

impl LogRepository {
    /// An empty repository with no durable backend.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            logs: Vec::new(),
            store: None,
        }
    }

    /// Hydrates from `store` and writes every later mutation through to it.
    pub fn load(store: impl LogStore + 'static) -> Result<Self> {
        let logs = store.get_all()?;
        tracing::debug!(count = logs.len(), "loaded logs");
        Ok(Self {
            logs,
            store: Some(Box::new(store)),
        })
    }

    // ── Reads ──

    pub fn all(&self) -> &[Log] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&Log> {
        self.logs.iter().find(|l| l.id == id)
    }

    /// Logs whose title or content contains `text`, ignoring case.
    ///
    /// Collection order is preserved; there is no ranking.
    pub fn query(&self, text: &str) -> Vec<&Log> {
        let folded = text.to_lowercase();
        self.logs.iter().filter(|l| l.matches(&folded)).collect()
    }

    /// All events, in collection order.
    pub fn events(&self) -> Vec<&Log> {
        self.logs
            .iter()
            .filter(|l| l.log_type() == LogType::Event)
            .collect()
    }

    /// The existing children of a collection, in the collection's order.
    ///
    /// Ids that no longer resolve are skipped. Returns `None` when `id`
    /// is not a collection.
    pub fn children(&self, id: Uuid) -> Option<Vec<&Log>> {
        let crate::model::LogKind::Collection { children, .. } = &self.get(id)?.kind else {
            return None;
        };
        Some(children.iter().filter_map(|c| self.get(*c)).collect())
    }

    /// How many logs of each type exist. Every type is present, possibly zero.
    pub fn counts_by_type(&self) -> BTreeMap<LogType, usize> {
        let mut counts: BTreeMap<LogType, usize> = LogType::ALL.iter().map(|t| (*t, 0)).collect();
        for log in &self.logs {
            *counts.entry(log.log_type()).or_default() += 1;
        }
        counts
    }

    // ── Mutations ──

    /// Creates a log and returns its fresh id.
    pub fn create(&mut self, new: NewLog) -> Result<Uuid> {
        let mut id = Uuid::new_v4();
        while self.position(id).is_some() {
            id = Uuid::new_v4();
        }
        let log = new.into_log(id, Timestamp::now());
        if let Some(store) = &self.store {
            store.insert(&log)?;
        }
        tracing::debug!(id = %id, kind = %log.log_type(), "created log");
        self.logs.push(log);
        Ok(id)
    }

    /// Merges `patch` into the log and refreshes `updated_at`.
    ///
    /// Returns `Ok(false)` when no log has this id.
    pub fn update(&mut self, id: Uuid, patch: LogPatch) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id = %id, "update of unknown log ignored");
            return Ok(false);
        };
        let current = &self.logs[index];
        if let Some(kind) = &patch.kind
            && kind.log_type() != current.log_type()
        {
            return Err(RepositoryError::TypeChange {
                id,
                from: current.log_type(),
                to: kind.log_type(),
            });
        }

        let mut updated = current.clone();
        patch.apply(&mut updated, Timestamp::now());
        self.replace(index, updated)?;
        Ok(true)
    }

    /// Removes the log. Collections that reference it keep the dangling id.
    ///
    /// Returns `Ok(false)` when no log has this id.
    pub fn delete(&mut self, id: Uuid) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id = %id, "delete of unknown log ignored");
            return Ok(false);
        };
        if let Some(store) = &self.store {
            store.delete(id)?;
        }
        self.logs.remove(index);
        tracing::debug!(id = %id, "deleted log");
        Ok(true)
    }

    /// Marks the log pinned. Does not touch `updated_at`.
    pub fn pin(&mut self, id: Uuid) -> Result<bool> {
        self.set_pinned(id, true)
    }

    /// Marks the log unpinned. Does not touch `updated_at`.
    pub fn unpin(&mut self, id: Uuid) -> Result<bool> {
        self.set_pinned(id, false)
    }

    fn set_pinned(&mut self, id: Uuid, pinned: bool) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id = %id, pinned, "pin change of unknown log ignored");
            return Ok(false);
        };
        if self.logs[index].pinned == pinned {
            return Ok(true);
        }
        let mut updated = self.logs[index].clone();
        updated.pinned = pinned;
        self.replace(index, updated)?;
        Ok(true)
    }

    /// Persists `log` and swaps it in at `index`.
    fn replace(&mut self, index: usize, log: Log) -> Result<()> {
        if let Some(store) = &self.store {
            store.update(&log)?;
        }
        self.logs[index] = log;
        Ok(())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.logs.iter().position(|l| l.id == id)
    }
}
