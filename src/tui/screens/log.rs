//! Log detail screen.

use jiff::Timestamp;
use ratatui::Frame;
use ratatui::text::{Line, Span};

use crate::model::{Log, LogKind};
use crate::repository::LogRepository;

use super::{Styles, render_window};

/// Read-only view of one log, captured when the window opens.
pub struct LogScreen {
    title: String,
    fields: Vec<(&'static str, String)>,
    children: Vec<String>,
    content: String,
}

impl LogScreen {
    pub fn new(log: &Log, repository: &LogRepository) -> Self {
        let mut fields = vec![
            ("type", log.log_type().to_string()),
            ("created", day_and_time(log.created_at)),
            ("updated", day_and_time(log.updated_at)),
            ("pinned", yes_no(log.pinned)),
        ];
        match &log.kind {
            LogKind::Note | LogKind::Collection { .. } => {}
            LogKind::Task {
                priority,
                due,
                done,
            } => {
                fields.push(("priority", priority.ordinal().to_string()));
                if let Some(due) = due {
                    fields.push(("due", day_and_time(*due)));
                }
                fields.push(("done", yes_no(*done)));
            }
            LogKind::Event {
                from,
                to,
                continuous,
            } => {
                fields.push(("from", day_and_time(*from)));
                fields.push(("to", day_and_time(*to)));
                fields.push(("all day", yes_no(*continuous)));
            }
        }

        let children = repository
            .children(log.id)
            .unwrap_or_default()
            .into_iter()
            .map(|child| format!("{} {}", child.log_type().glyph(), child.display_title()))
            .collect();

        Self {
            title: format!("{} {}", log.log_type().glyph(), log.display_title()),
            fields,
            children,
            content: log.content.clone(),
        }
    }

    pub fn render(&self, frame: &mut Frame, styles: Styles) {
        let mut body: Vec<Line> = self
            .fields
            .iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("{name:<10}"), styles.muted),
                    Span::styled(value.as_str(), styles.normal),
                ])
            })
            .collect();

        if !self.children.is_empty() {
            body.push(Line::default());
            body.push(Line::from(Span::styled("Children", styles.muted)));
            body.extend(
                self.children
                    .iter()
                    .map(|c| Line::from(Span::styled(format!("  {c}"), styles.normal))),
            );
        }

        body.push(Line::default());
        body.extend(
            self.content
                .lines()
                .map(|l| Line::from(Span::styled(l, styles.normal))),
        );

        render_window(frame, styles, &self.title, body, " esc back");
    }
}

fn day_and_time(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M").to_string()
}

fn yes_no(flag: bool) -> String {
    let word = if flag { "yes" } else { "no" };
    word.to_string()
}
