//! The log record and the payloads used to create and change one.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LogKind, LogType};

/// Shown in place of a missing title.
pub const UNTITLED: &str = "Untitled";

/// A single user-created record.
///
/// `id` and the variant of `kind` are fixed at creation.
/// `updated_at` moves on every content change, never on pin state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub pinned: bool,
    #[serde(flatten)]
    pub kind: LogKind,
}

impl Log {
    pub fn log_type(&self) -> LogType {
        self.kind.log_type()
    }

    /// The title, or "Untitled" when there is none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Whether `folded` (already lowercased) occurs in the title or content.
    ///
    /// An empty needle matches everything.
    pub fn matches(&self, folded: &str) -> bool {
        if folded.is_empty() {
            return true;
        }
        self.title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(folded))
            || self.content.to_lowercase().contains(folded)
    }
}

/// Fields supplied when creating a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLog {
    pub title: Option<String>,
    pub content: String,
    pub pinned: bool,
    pub kind: LogKind,
}

impl NewLog {
    /// An unpinned note.
    #[cfg(test)]
    pub fn note(title: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            title: title.map(String::from),
            content: content.into(),
            pinned: false,
            kind: LogKind::Note,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Builds the record this payload describes.
    pub(crate) fn into_log(self, id: Uuid, now: Timestamp) -> Log {
        Log {
            id,
            title: self.title,
            content: self.content,
            created_at: now,
            updated_at: now,
            pinned: self.pinned,
            kind: self.kind,
        }
    }
}

/// A partial update. `None` leaves a field untouched.
///
/// `title: Some(None)` clears the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPatch {
    pub title: Option<Option<String>>,
    pub content: Option<String>,
    pub kind: Option<LogKind>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.kind.is_none()
    }

    /// Merges the patch into `log`. The caller checks the variant is unchanged.
    pub(crate) fn apply(self, log: &mut Log, now: Timestamp) {
        if let Some(title) = self.title {
            log.title = title;
        }
        if let Some(content) = self.content {
            log.content = content;
        }
        if let Some(kind) = self.kind {
            log.kind = kind;
        }
        log.updated_at = now.max(log.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::Priority;

    fn sample(title: Option<&str>, content: &str) -> Log {
        NewLog::note(title, content).into_log(Uuid::new_v4(), Timestamp::now())
    }

    #[test]
    fn missing_title_displays_untitled() {
        assert_eq!(sample(None, "body").display_title(), "Untitled");
        assert_eq!(sample(Some("Alpha"), "body").display_title(), "Alpha");
    }

    #[test]
    fn matches_title_or_content_case_insensitively() {
        let log = sample(Some("Grocery List"), "Buy MILK");
        assert!(log.matches("grocery"));
        assert!(log.matches("milk"));
        assert!(log.matches(""));
        assert!(!log.matches("bread"));
    }

    #[test]
    fn untitled_log_matches_on_content_only() {
        let log = sample(None, "TestTask");
        assert!(log.matches("testtask"));
        assert!(!log.matches("untitled"));
    }

    #[test]
    fn patch_merges_fields_and_refreshes_updated_at() {
        let mut log = sample(Some("Old"), "old body");
        let created = log.created_at;
        let later = Timestamp::new(created.as_second() + 60, 0).unwrap();

        LogPatch {
            title: Some(None),
            content: Some("new body".into()),
            kind: None,
        }
        .apply(&mut log, later);

        assert_eq!(log.title, None);
        assert_eq!(log.content, "new body");
        assert_eq!(log.updated_at, later);
        assert_eq!(log.created_at, created);
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let mut log = sample(None, "x");
        let earlier = Timestamp::new(log.created_at.as_second() - 3600, 0).unwrap();
        LogPatch::default().apply(&mut log, earlier);
        assert!(log.updated_at >= log.created_at);
    }

    #[test]
    fn log_serializes_flat_with_type_tag() {
        let mut log = sample(Some("Ship it"), "release");
        log.kind = LogKind::Task {
            priority: Priority::Medium,
            due: None,
            done: false,
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["type"], "task");
        assert_eq!(json["title"], "Ship it");
        assert_eq!(json["pinned"], false);
    }
}
