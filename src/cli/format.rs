//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::model::{CollectionType, Log, LogKind};
use crate::repository::LogRepository;

/// Longest content snippet shown in one-line listings.
const SNIPPET_CHARS: usize = 48;

/// First eight characters of the id, enough to address a log from the CLI.
pub(super) fn short_id(log: &Log) -> String {
    log.id.to_string()[..8].to_string()
}

pub(super) fn format_timestamp(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M").to_string()
}

/// One line per log: id, glyph, pin marker, title, and a content snippet.
pub(super) fn format_row(log: &Log) -> String {
    let pin = if log.pinned { "*" } else { " " };
    format!(
        "{}  {} {pin} {}  {}",
        short_id(log),
        log.log_type().glyph(),
        log.display_title(),
        snippet(&log.content),
    )
}

/// Full multi-line view of a log.
pub(super) fn format_detail(log: &Log, repository: &LogRepository) -> String {
    let mut lines = vec![
        format!("{}  [{}]", log.display_title(), log.log_type()),
        format!("id:       {}", log.id),
        format!("created:  {}", format_timestamp(log.created_at)),
        format!("updated:  {}", format_timestamp(log.updated_at)),
        format!("pinned:   {}", if log.pinned { "yes" } else { "no" }),
    ];

    match &log.kind {
        LogKind::Note => {}
        LogKind::Task {
            priority,
            due,
            done,
        } => {
            lines.push(format!("priority: {}", priority.ordinal()));
            if let Some(due) = due {
                lines.push(format!("due:      {}", format_timestamp(*due)));
            }
            lines.push(format!("done:     {}", if *done { "yes" } else { "no" }));
        }
        LogKind::Event {
            from,
            to,
            continuous,
        } => {
            lines.push(format!(
                "when:     {} → {}",
                format_timestamp(*from),
                format_timestamp(*to)
            ));
            if *continuous {
                lines.push("all day".to_string());
            }
        }
        LogKind::Collection {
            children,
            collection_type,
        } => {
            let layout = match collection_type {
                CollectionType::List => "list",
                CollectionType::Board => "board",
            };
            let resolved = repository.children(log.id).unwrap_or_default();
            lines.push(format!(
                "children: {} ({layout}, {} missing)",
                resolved.len(),
                children.len() - resolved.len()
            ));
            for child in resolved {
                lines.push(format!("  {}", format_row(child)));
            }
        }
    }

    lines.push(String::new());
    lines.push(log.content.clone());
    lines.join("\n")
}

/// First line of `content`, cut to a readable length.
fn snippet(content: &str) -> String {
    let first = content.lines().next().unwrap_or_default();
    if first.chars().count() > SNIPPET_CHARS {
        let cut: String = first.chars().take(SNIPPET_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}
