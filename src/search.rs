//! Search: filter logs by a query and split them into pinned and unpinned.
//!
//! Pure and uncached. The palette calls it again after every keystroke
//! and every mutation, so the same `(query, logs)` always gives the
//! same output.

use uuid::Uuid;

use crate::model::Log;

/// Matching logs, partitioned by pin state. Each keeps collection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults<'a> {
    pub pinned: Vec<&'a Log>,
    pub unpinned: Vec<&'a Log>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.unpinned.is_empty()
    }

    pub fn pinned_ids(&self) -> Vec<Uuid> {
        self.pinned.iter().map(|l| l.id).collect()
    }

    pub fn unpinned_ids(&self) -> Vec<Uuid> {
        self.unpinned.iter().map(|l| l.id).collect()
    }
}

/// Logs whose title or content contains `query`, ignoring case.
///
/// An empty query matches every log. Non-matches are dropped entirely.
pub fn search<'a>(query: &str, logs: &'a [Log]) -> SearchResults<'a> {
    let folded = query.to_lowercase();
    let (pinned, unpinned): (Vec<&Log>, Vec<&Log>) = logs
        .iter()
        .filter(|l| l.matches(&folded))
        .partition(|l| l.pinned);
    SearchResults { pinned, unpinned }
}
