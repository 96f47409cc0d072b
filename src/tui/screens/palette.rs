//! Palette screen: query line, shortcuts, pinned and unpinned results.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph};
use uuid::Uuid;

use crate::model::Log;
use crate::palette::{
    Intent, Key, MenuOption, Palette, Pointer, ScrollAdapter, ScrollRequest, Section,
    SelectableItem, Shortcut,
};
use crate::repository::LogRepository;

use super::Styles;

/// Most rows the pinned section takes before it scrolls.
const PINNED_ROWS: u16 = 5;

/// Columns at the end of a row that open its context menu.
const MORE_WIDTH: u16 = 3;

const MENU_WIDTH: u16 = 20;

pub struct PaletteScreen {
    palette: Palette,
    view: View,
}

/// Scroll state of the result lists, plus where everything landed on the
/// last frame so clicks can be mapped back to items.
#[derive(Debug, Default)]
struct View {
    pinned: ListState,
    unpinned: ListState,
    buttons: Vec<Rect>,
    lists: Vec<ListHit>,
    menu: Option<Rect>,
}

/// A result list as drawn.
#[derive(Debug)]
struct ListHit {
    area: Rect,
    /// Sequence index of the list's first row.
    first: usize,
    offset: usize,
    ids: Vec<Uuid>,
}

impl ScrollAdapter for View {
    fn scroll_into_view(&mut self, request: ScrollRequest) {
        // A selected ListState row is kept visible by moving the offset
        // only as far as the nearest edge.
        match request.section {
            Section::Navigation => {}
            Section::Pinned => self.pinned.select(Some(request.offset)),
            Section::Unpinned => self.unpinned.select(Some(request.offset)),
        }
    }
}

impl View {
    /// Pointer events for a left click at `position`, in delivery order.
    fn pointers_at(&self, position: Position, menu_open: bool) -> Vec<Pointer> {
        if let Some(menu) = self.menu
            && menu.contains(position)
        {
            return position
                .y
                .checked_sub(menu.y + 1)
                .map(|row| Pointer::ClickMenuOption(usize::from(row)))
                .into_iter()
                .collect();
        }

        let target = self.target_at(position);
        let mut pointers = Vec::new();
        if menu_open && !matches!(target, Some(Pointer::ClickMore(_))) {
            pointers.push(Pointer::DownOutside);
        }
        pointers.extend(target);
        pointers
    }

    fn target_at(&self, position: Position) -> Option<Pointer> {
        if let Some(i) = self.buttons.iter().position(|b| b.contains(position)) {
            return Some(Pointer::ClickItem(i));
        }
        let list = self.lists.iter().find(|l| l.area.contains(position))?;
        let row = list.offset + usize::from(position.y - list.area.y);
        let id = *list.ids.get(row)?;
        if position.x >= list.area.right().saturating_sub(MORE_WIDTH) {
            Some(Pointer::ClickMore(id))
        } else {
            Some(Pointer::ClickItem(list.first + row))
        }
    }
}

impl PaletteScreen {
    pub fn new(repository: LogRepository) -> Self {
        let mut screen = Self {
            palette: Palette::new(repository),
            view: View::default(),
        };
        screen.refresh();
        screen
    }

    pub fn repository(&self) -> &LogRepository {
        self.palette.repository()
    }

    pub fn refresh(&mut self) {
        self.palette.refresh(&mut self.view);
    }

    pub fn on_key(&mut self, key: Key) -> Option<Intent> {
        self.palette.handle_key(key, &mut self.view)
    }

    pub fn on_click(&mut self, column: u16, row: u16) -> Option<Intent> {
        let menu_open = self.palette.menu().is_some();
        let mut intent = None;
        for pointer in self.view.pointers_at(Position::new(column, row), menu_open) {
            intent = self.palette.handle_pointer(pointer, &mut self.view).or(intent);
        }
        intent
    }

    pub fn render(&mut self, frame: &mut Frame, styles: Styles) {
        let results = self.palette.results();
        let selected = self.palette.selected_item();
        let selected_in = |section: Section| match selected {
            Some(SelectableItem::Log { id, section: s }) if s == section => Some(id),
            _ => None,
        };

        let pinned_rows = if results.pinned.is_empty() {
            0
        } else {
            1 + u16::try_from(results.pinned.len()).map_or(PINNED_ROWS, |n| n.min(PINNED_ROWS))
        };
        let chunks = Layout::vertical([
            Constraint::Length(3),           // query
            Constraint::Length(2),           // shortcuts
            Constraint::Length(pinned_rows), // pinned
            Constraint::Min(0),              // all logs
            Constraint::Length(1),           // help
        ])
        .split(frame.area());

        // Query.
        let query = if self.palette.query().is_empty() {
            Line::from(Span::styled("Search logs…", styles.muted))
        } else {
            Line::from(vec![
                Span::styled(self.palette.query(), styles.highlight),
                Span::styled("▏", styles.muted),
            ])
        };
        let query = Paragraph::new(query).block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(query, chunks[0]);

        // Shortcut buttons.
        self.view.buttons.clear();
        let mut x = chunks[1].x + 2;
        for shortcut in Shortcut::ALL {
            let label = format!(" {} ", shortcut.title());
            let width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
            let rect = Rect::new(x, chunks[1].y, width, 1).intersection(chunks[1]);
            let style = if selected == Some(SelectableItem::Shortcut(shortcut)) {
                styles.highlight.add_modifier(Modifier::REVERSED)
            } else {
                styles.normal
            };
            frame.render_widget(Paragraph::new(Span::styled(label, style)), rect);
            self.view.buttons.push(rect);
            x = x.saturating_add(width + 1);
        }

        // Results.
        let nav = Shortcut::ALL.len();
        self.view.lists.clear();
        if !results.pinned.is_empty() {
            let hit = render_section(
                frame,
                chunks[2],
                Section::Pinned,
                &results.pinned,
                nav,
                selected_in(Section::Pinned),
                &mut self.view.pinned,
                styles,
            );
            self.view.lists.extend(hit);
        }
        let hit = render_section(
            frame,
            chunks[3],
            Section::Unpinned,
            &results.unpinned,
            nav + results.pinned.len(),
            selected_in(Section::Unpinned),
            &mut self.view.unpinned,
            styles,
        );
        self.view.lists.extend(hit);

        // Context menu, anchored under its row.
        self.view.menu = None;
        if let (Some((id, options)), Some(menu)) =
            (self.palette.menu_options(), self.palette.menu())
            && let Some(anchor) = self.view.lists.iter().find_map(|l| row_rect(l, id))
        {
            let area = menu_rect(anchor, frame.area());
            let items: Vec<ListItem> = options
                .iter()
                .enumerate()
                .map(|(i, option)| option_item(*option, i == menu.focused(), area.width, styles))
                .collect();
            frame.render_widget(Clear, area);
            frame.render_widget(List::new(items).block(Block::bordered()), area);
            self.view.menu = Some(area);
        }

        // Help line.
        let help = if self.palette.menu().is_some() {
            " ↑↓ choose  ⏎ confirm  esc dismiss"
        } else {
            " ↑↓ navigate  ⏎ open  ⇧⇥ actions  esc quit"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(help, styles.muted))),
            chunks[4],
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn render_section(
    frame: &mut Frame,
    area: Rect,
    section: Section,
    logs: &[&Log],
    first: usize,
    selected: Option<Uuid>,
    state: &mut ListState,
    styles: Styles,
) -> Option<ListHit> {
    let [heading, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let heading = heading.inner(Margin::new(2, 0));
    let body = body.inner(Margin::new(2, 0));

    frame.render_widget(
        Paragraph::new(Span::styled(
            section.heading().unwrap_or_default(),
            styles.muted,
        )),
        heading,
    );
    if logs.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No results found", styles.muted)),
            body,
        );
        return None;
    }

    let width = usize::from(body.width);
    let items: Vec<ListItem> = logs
        .iter()
        .map(|log| {
            let is_selected = selected == Some(log.id);
            let style = if is_selected {
                styles.highlight
            } else {
                styles.normal
            };
            let pointer = if is_selected { "› " } else { "  " };
            let label = format!(
                "{pointer}{} {}",
                log.log_type().glyph(),
                log.display_title()
            );
            let date = log.updated_at.strftime("%Y-%m-%d").to_string();
            let more = "  ⋯ ";
            let pad = width.saturating_sub(
                label.chars().count() + date.chars().count() + more.chars().count(),
            );
            ListItem::new(Line::from(vec![
                Span::styled(label, style),
                Span::raw(" ".repeat(pad)),
                Span::styled(date, styles.muted),
                Span::styled(more, style),
            ]))
        })
        .collect();

    frame.render_stateful_widget(List::new(items), body, state);
    Some(ListHit {
        area: body,
        first,
        offset: state.offset(),
        ids: logs.iter().map(|l| l.id).collect(),
    })
}

/// The row showing `id`, if it is scrolled into view.
fn row_rect(list: &ListHit, id: Uuid) -> Option<Rect> {
    let row = list.ids.iter().position(|i| *i == id)?.checked_sub(list.offset)?;
    let row = u16::try_from(row).ok().filter(|r| *r < list.area.height)?;
    Some(Rect::new(
        list.area.x,
        list.area.y + row,
        list.area.width,
        1,
    ))
}

/// Right-aligned under the anchor row, or above it when there's no room.
fn menu_rect(anchor: Rect, screen: Rect) -> Rect {
    let height = 5;
    let width = MENU_WIDTH.min(anchor.width);
    let x = anchor.right().saturating_sub(width);
    let y = if anchor.bottom() + height <= screen.bottom() {
        anchor.bottom()
    } else {
        anchor.y.saturating_sub(height)
    };
    Rect::new(x, y, width, height).intersection(screen)
}

fn option_item(option: MenuOption, focused: bool, width: u16, styles: Styles) -> ListItem<'static> {
    let mut style = if option.is_destructive() {
        styles.danger
    } else {
        styles.normal
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let inner = usize::from(width.saturating_sub(2));
    let label = format!(" {}", option.label());
    let hint = format!("{} ", option.hint());
    let pad = inner.saturating_sub(label.chars().count() + hint.chars().count());
    ListItem::new(Line::from(vec![
        Span::styled(label, style),
        Span::styled(" ".repeat(pad), style),
        Span::styled(hint, style),
    ]))
}
