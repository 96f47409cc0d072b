//! Application loop and screen routing.

use std::io;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::palette::{Intent, Key, Window};
use crate::repository::LogRepository;
use crate::storage::{SettingsStore, Theme};

use super::screens::{
    AnalyticsScreen, CalendarScreen, LogScreen, PaletteScreen, SettingsScreen, Styles,
};

/// Which window is in front. The palette lives outside so its query and
/// selection survive a trip to another window.
enum Screen {
    Palette,
    Log(LogScreen),
    Calendar(CalendarScreen),
    Analytics(AnalyticsScreen),
    Settings(SettingsScreen),
}

/// What the loop does after an intent.
enum Transition {
    Stay,
    Show(Screen),
    Quit,
}

/// Runs the TUI event loop until the user quits.
pub fn run(repository: LogRepository, settings: SettingsStore) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .and_then(|()| event_loop(&mut terminal, repository, &settings));
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        tracing::warn!(error = %e, "failed to release mouse");
    }
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    repository: LogRepository,
    settings: &SettingsStore,
) -> io::Result<()> {
    let mut palette = PaletteScreen::new(repository);
    let mut screen = Screen::Palette;
    let mut theme = load_theme(settings);

    loop {
        let styles = Styles::for_theme(theme);
        terminal.draw(|frame| match &screen {
            Screen::Palette => palette.render(frame, styles),
            Screen::Log(s) => s.render(frame, styles),
            Screen::Calendar(s) => s.render(frame, styles),
            Screen::Analytics(s) => s.render(frame, styles),
            Screen::Settings(s) => s.render(frame, styles),
        })?;

        let transition = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return Ok(());
                }
                match &mut screen {
                    Screen::Palette => match palette_key(key) {
                        Some(k) => palette
                            .on_key(k)
                            .map_or(Transition::Stay, |i| follow(i, &palette, settings, theme)),
                        None => Transition::Stay,
                    },
                    Screen::Settings(s) => match key.code {
                        KeyCode::Enter => {
                            s.toggle_theme();
                            theme = s.theme();
                            Transition::Stay
                        }
                        KeyCode::Char('r') => {
                            s.reset();
                            theme = s.theme();
                            Transition::Stay
                        }
                        KeyCode::Esc | KeyCode::Char('q') => Transition::Show(Screen::Palette),
                        _ => Transition::Stay,
                    },
                    Screen::Log(_) | Screen::Calendar(_) | Screen::Analytics(_) => {
                        match key.code {
                            KeyCode::Esc | KeyCode::Char('q') => Transition::Show(Screen::Palette),
                            _ => Transition::Stay,
                        }
                    }
                }
            }
            Event::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && matches!(screen, Screen::Palette) =>
            {
                palette
                    .on_click(mouse.column, mouse.row)
                    .map_or(Transition::Stay, |i| follow(i, &palette, settings, theme))
            }
            _ => Transition::Stay,
        };

        match transition {
            Transition::Stay => {}
            Transition::Show(next) => {
                if matches!(next, Screen::Palette) {
                    palette.refresh();
                }
                screen = next;
            }
            Transition::Quit => return Ok(()),
        }
    }
}

/// Keys the palette understands. Everything else is ignored, including
/// characters typed with Ctrl or Alt held.
fn palette_key(key: KeyEvent) -> Option<Key> {
    match key.code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::BackTab => Some(Key::BackTab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            Some(Key::Char(c))
        }
        _ => None,
    }
}

fn follow(
    intent: Intent,
    palette: &PaletteScreen,
    settings: &SettingsStore,
    theme: Theme,
) -> Transition {
    let repository = palette.repository();
    match intent {
        Intent::OpenLog(id) => match repository.get(id) {
            Some(log) => {
                tracing::debug!(%id, "open log");
                Transition::Show(Screen::Log(LogScreen::new(log, repository)))
            }
            None => Transition::Stay,
        },
        Intent::OpenWindow(window) => {
            tracing::debug!(window = window.name(), "open window");
            match window {
                Window::Search => Transition::Show(Screen::Palette),
                Window::Calendar => Transition::Show(Screen::Calendar(CalendarScreen::new(
                    repository,
                ))),
                Window::Analytics => Transition::Show(Screen::Analytics(AnalyticsScreen::new(
                    repository,
                ))),
                Window::Settings => Transition::Show(Screen::Settings(SettingsScreen::new(
                    settings.clone(),
                    theme,
                ))),
            }
        }
        Intent::CloseWindow(Window::Search) => Transition::Quit,
        Intent::CloseWindow(window) => {
            tracing::debug!(window = window.name(), "close window");
            Transition::Show(Screen::Palette)
        }
    }
}

fn load_theme(settings: &SettingsStore) -> Theme {
    settings.load().map(|s| s.theme).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load settings, using defaults");
        Theme::default()
    })
}
