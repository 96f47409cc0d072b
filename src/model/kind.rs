//! Log variants: what kind of record a log is.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The variant-specific part of a log.
///
/// Tagged so each stored record is self-describing when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogKind {
    /// Free-form text.
    Note,

    /// Something to get done.
    Task {
        priority: Priority,
        due: Option<Timestamp>,
        #[serde(default)]
        done: bool,
    },

    /// Something that happens over a span of time.
    Event {
        from: Timestamp,
        to: Timestamp,
        /// Spans whole days rather than a time range.
        #[serde(default)]
        continuous: bool,
    },

    /// An ordered group of other logs, referenced by id.
    #[serde(rename_all = "camelCase")]
    Collection {
        children: Vec<Uuid>,
        collection_type: CollectionType,
    },
}

impl LogKind {
    /// The field-less tag for this variant.
    pub fn log_type(&self) -> LogType {
        match self {
            Self::Note => LogType::Note,
            Self::Task { .. } => LogType::Task,
            Self::Event { .. } => LogType::Event,
            Self::Collection { .. } => LogType::Collection,
        }
    }
}

/// Which variant a log is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogType {
    Note,
    Task,
    Event,
    Collection,
}

impl LogType {
    pub const ALL: [Self; 4] = [Self::Note, Self::Task, Self::Event, Self::Collection];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Task => "task",
            Self::Event => "event",
            Self::Collection => "collection",
        }
    }

    /// Single-width glyph shown next to the log in lists.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Note => "≡",
            Self::Task => "☐",
            Self::Event => "◷",
            Self::Collection => "▤",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "note" => Ok(Self::Note),
            "task" => Ok(Self::Task),
            "event" => Ok(Self::Event),
            "collection" => Ok(Self::Collection),
            other => Err(format!(
                "unknown log type '{other}', expected one of: note, task, event, collection"
            )),
        }
    }
}

/// Task priority, ordinal 0 (low) to 2 (high).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

/// How a collection presents its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionType {
    #[default]
    List,
    Board,
}
