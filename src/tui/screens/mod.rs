//! Screen rendering and input handling.

mod log;
mod palette;
mod windows;

pub use log::LogScreen;
pub use palette::PaletteScreen;
pub use windows::{AnalyticsScreen, CalendarScreen, SettingsScreen};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::storage::Theme;

/// Text styles for the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub muted: Style,
    pub normal: Style,
    pub highlight: Style,
    pub danger: Style,
}

impl Styles {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                muted: Style::default().fg(Color::DarkGray),
                normal: Style::default().fg(Color::Gray),
                highlight: Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                danger: Style::default().fg(Color::LightRed),
            },
            Theme::Light => Self {
                muted: Style::default().fg(Color::Gray),
                normal: Style::default().fg(Color::DarkGray),
                highlight: Style::default()
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
                danger: Style::default().fg(Color::Red),
            },
        }
    }
}

/// Header, body and help line: the layout every secondary window shares.
fn render_window(frame: &mut Frame, styles: Styles, title: &str, body: Vec<Line<'_>>, help: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Min(0),    // body
        Constraint::Length(1), // help
    ])
    .split(frame.area());

    let header = Paragraph::new(Line::from(Span::styled(title, styles.highlight)))
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
    frame.render_widget(header, chunks[0]);

    let body = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(body, chunks[1]);

    let help = Paragraph::new(Line::from(Span::styled(help, styles.muted)));
    frame.render_widget(help, chunks[2]);
}
