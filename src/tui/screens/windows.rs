//! The windows behind the navigation shortcuts.

use jiff::Timestamp;
use ratatui::Frame;
use ratatui::text::{Line, Span};

use crate::model::{LogKind, LogType};
use crate::repository::LogRepository;
use crate::storage::{SettingKey, SettingsStore, Theme};

use super::{Styles, render_window};

/// Upcoming and past events, earliest first.
pub struct CalendarScreen {
    rows: Vec<(Timestamp, String)>,
}

impl CalendarScreen {
    pub fn new(repository: &LogRepository) -> Self {
        let mut rows: Vec<_> = repository
            .events()
            .into_iter()
            .filter_map(|log| match log.kind {
                LogKind::Event { from, .. } => Some((from, log.display_title().to_string())),
                _ => None,
            })
            .collect();
        rows.sort_by_key(|(from, _)| *from);
        Self { rows }
    }

    pub fn render(&self, frame: &mut Frame, styles: Styles) {
        let body = if self.rows.is_empty() {
            vec![Line::from(Span::styled("No events", styles.muted))]
        } else {
            self.rows
                .iter()
                .map(|(when, title)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{}  ", when.strftime("%Y-%m-%d %H:%M")),
                            styles.muted,
                        ),
                        Span::styled(title.as_str(), styles.normal),
                    ])
                })
                .collect()
        };
        render_window(frame, styles, "Calendar", body, " esc back");
    }
}

/// How many logs of each type exist.
pub struct AnalyticsScreen {
    counts: Vec<(LogType, usize)>,
    pinned: usize,
    total: usize,
}

impl AnalyticsScreen {
    pub fn new(repository: &LogRepository) -> Self {
        let by_type = repository.counts_by_type();
        Self {
            counts: LogType::ALL
                .iter()
                .map(|t| (*t, by_type.get(t).copied().unwrap_or(0)))
                .collect(),
            pinned: repository.all().iter().filter(|l| l.pinned).count(),
            total: repository.len(),
        }
    }

    pub fn render(&self, frame: &mut Frame, styles: Styles) {
        let mut body: Vec<Line> = self
            .counts
            .iter()
            .map(|(ty, n)| {
                Line::from(vec![
                    Span::styled(format!("{} {:<12}", ty.glyph(), ty.as_str()), styles.muted),
                    Span::styled(n.to_string(), styles.normal),
                ])
            })
            .collect();
        body.push(Line::default());
        body.push(Line::from(vec![
            Span::styled(format!("{:<14}", "pinned"), styles.muted),
            Span::styled(self.pinned.to_string(), styles.normal),
        ]));
        body.push(Line::from(vec![
            Span::styled(format!("{:<14}", "total"), styles.muted),
            Span::styled(self.total.to_string(), styles.highlight),
        ]));
        render_window(frame, styles, "Analytics", body, " esc back");
    }
}

/// Theme switcher backed by the settings file.
pub struct SettingsScreen {
    store: SettingsStore,
    theme: Theme,
}

impl SettingsScreen {
    pub fn new(store: SettingsStore, theme: Theme) -> Self {
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and saves it. Keeps the old theme if saving fails.
    pub fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        match self.store.set(SettingKey::Theme, next.as_str()) {
            Ok(()) => self.theme = next,
            Err(e) => tracing::warn!(error = %e, "failed to save theme"),
        }
    }

    /// Restores default settings.
    pub fn reset(&mut self) {
        match self.store.reset() {
            Ok(()) => self.theme = Theme::default(),
            Err(e) => tracing::warn!(error = %e, "failed to reset settings"),
        }
    }

    pub fn render(&self, frame: &mut Frame, styles: Styles) {
        let body = vec![Line::from(vec![
            Span::styled(format!("{:<10}", "theme"), styles.muted),
            Span::styled(self.theme.as_str(), styles.highlight),
        ])];
        render_window(
            frame,
            styles,
            "Settings",
            body,
            " ⏎ toggle theme  r reset  esc back",
        );
    }
}
