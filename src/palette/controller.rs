//! Palette controller: routes input to whichever state machine owns it.
//!
//! Navigation keys go to the context menu while one is open, and to the
//! selection otherwise. Typed characters always edit the query. The
//! sequence is re-derived from the repository before every event and
//! again after it, so no event ever sees a stale snapshot.

use uuid::Uuid;

use crate::repository::LogRepository;
use crate::search::{self, SearchResults};

use super::menu::OPTION_COUNT;
use super::{
    ContextMenu, Intent, MenuOption, ScrollAdapter, ScrollRequest, Sections, SelectableItem,
    Selection, Window,
};

/// Keyboard input the palette understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
    /// Shift+Tab: open the context menu of the selected log.
    BackTab,
    Char(char),
    Backspace,
}

/// Pointer input the palette understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    /// Clicked the item at this sequence index.
    ClickItem(usize),
    /// Clicked the "more" trigger of a log.
    ClickMore(Uuid),
    /// Clicked an entry of the open context menu.
    ClickMenuOption(usize),
    /// Pressed somewhere that is neither the open menu nor its trigger.
    DownOutside,
}

/// Which state machine owns navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Navigate,
    Menu(ContextMenu),
}

/// The palette: query, selection and context menu over a repository.
pub struct Palette {
    repository: LogRepository,
    query: String,
    selection: Selection,
    mode: Mode,
}

impl Palette {
    pub fn new(repository: LogRepository) -> Self {
        Self {
            repository,
            query: String::new(),
            selection: Selection::new(),
            mode: Mode::Navigate,
        }
    }

    pub fn repository(&self) -> &LogRepository {
        &self.repository
    }

    /// Direct repository access. Call [`Palette::refresh`] afterwards.
    #[cfg(test)]
    pub fn repository_mut(&mut self) -> &mut LogRepository {
        &mut self.repository
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current search results for the query.
    pub fn results(&self) -> SearchResults<'_> {
        search::search(&self.query, self.repository.all())
    }

    /// The selectable sequence for the current query and repository.
    pub fn sections(&self) -> Sections {
        Sections::from_results(&self.results())
    }

    /// The selected sequence index, or `None` when nothing is selectable.
    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> {
        self.selection.current(self.sections().len())
    }

    pub fn selected_item(&self) -> Option<SelectableItem> {
        let sections = self.sections();
        self.selection
            .current(sections.len())
            .and_then(|i| sections.get(i))
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        match &self.mode {
            Mode::Menu(menu) => Some(menu),
            Mode::Navigate => None,
        }
    }

    /// Entries of the open context menu, for rendering.
    pub fn menu_options(&self) -> Option<(Uuid, [MenuOption; OPTION_COUNT])> {
        let menu = self.menu()?;
        let pinned = self.repository.get(menu.item())?.pinned;
        Some((menu.item(), MenuOption::for_item(pinned)))
    }

    /// Reconciles selection and menu with the repository after outside changes.
    pub fn refresh(&mut self, scroll: &mut dyn ScrollAdapter) {
        self.settle(scroll);
    }

    /// Handles one key press. Returns what the host should do, if anything.
    pub fn handle_key(&mut self, key: Key, scroll: &mut dyn ScrollAdapter) -> Option<Intent> {
        self.settle(scroll);
        let intent = match (self.mode, key) {
            (_, Key::Char(c)) => {
                self.query.push(c);
                None
            }
            (_, Key::Backspace) => {
                self.query.pop();
                None
            }
            (Mode::Menu(menu), key) => self.handle_menu_key(menu, key),
            (Mode::Navigate, key) => self.handle_navigation_key(key, scroll),
        };
        self.settle(scroll);
        intent
    }

    /// Handles one pointer event. Returns what the host should do, if anything.
    pub fn handle_pointer(
        &mut self,
        pointer: Pointer,
        scroll: &mut dyn ScrollAdapter,
    ) -> Option<Intent> {
        self.settle(scroll);
        let intent = match pointer {
            Pointer::ClickItem(index) => {
                let sections = self.sections();
                if self.selection.select(index, sections.len()) {
                    self.request_scroll(&sections, scroll);
                }
                sections.get(index).map(SelectableItem::action)
            }
            Pointer::ClickMore(id) => {
                let visible = self.sections().index_of(id).is_some();
                self.mode = match self.mode {
                    Mode::Menu(menu) if menu.item() == id => Mode::Navigate,
                    _ if visible => Mode::Menu(ContextMenu::open(id)),
                    mode => mode,
                };
                None
            }
            Pointer::ClickMenuOption(index) => match self.mode {
                Mode::Menu(menu) if index < OPTION_COUNT => {
                    let pinned = self.repository.get(menu.item()).is_some_and(|l| l.pinned);
                    let option = MenuOption::for_item(pinned)[index];
                    self.mode = Mode::Navigate;
                    self.execute(option, menu.item())
                }
                _ => None,
            },
            Pointer::DownOutside => {
                self.mode = Mode::Navigate;
                None
            }
        };
        self.settle(scroll);
        intent
    }

    fn handle_navigation_key(
        &mut self,
        key: Key,
        scroll: &mut dyn ScrollAdapter,
    ) -> Option<Intent> {
        let sections = self.sections();
        let len = sections.len();
        match key {
            Key::Down => {
                if self.selection.move_down(len) {
                    self.request_scroll(&sections, scroll);
                }
                None
            }
            Key::Up => {
                if self.selection.move_up(len) {
                    self.request_scroll(&sections, scroll);
                }
                None
            }
            Key::Enter => self
                .selection
                .current(len)
                .and_then(|i| sections.get(i))
                .map(SelectableItem::action),
            Key::Escape => {
                if self.query.is_empty() {
                    Some(Intent::CloseWindow(Window::Search))
                } else {
                    self.query.clear();
                    None
                }
            }
            Key::BackTab => {
                let selected = self.selection.current(len).and_then(|i| sections.get(i));
                if let Some(id) = selected.and_then(SelectableItem::log_id) {
                    self.mode = Mode::Menu(ContextMenu::open(id));
                }
                None
            }
            Key::Char(_) | Key::Backspace => None,
        }
    }

    fn handle_menu_key(&mut self, mut menu: ContextMenu, key: Key) -> Option<Intent> {
        match key {
            Key::Down => {
                menu.focus_next();
                self.mode = Mode::Menu(menu);
                None
            }
            Key::Up => {
                menu.focus_prev();
                self.mode = Mode::Menu(menu);
                None
            }
            Key::Enter => {
                let pinned = self.repository.get(menu.item()).is_some_and(|l| l.pinned);
                self.mode = Mode::Navigate;
                self.execute(menu.focused_option(pinned), menu.item())
            }
            Key::Escape => {
                self.mode = Mode::Navigate;
                None
            }
            Key::BackTab | Key::Char(_) | Key::Backspace => None,
        }
    }

    /// Runs a menu entry against the repository.
    ///
    /// Failures are logged; the palette carries on with whatever the
    /// repository still holds.
    fn execute(&mut self, option: MenuOption, id: Uuid) -> Option<Intent> {
        let result = match option {
            MenuOption::Open => return Some(Intent::OpenLog(id)),
            MenuOption::Pin => self.repository.pin(id),
            MenuOption::Unpin => self.repository.unpin(id),
            MenuOption::Delete => self.repository.delete(id),
        };
        if let Err(e) = result {
            tracing::warn!(id = %id, action = option.label(), error = %e, "menu action failed");
        }
        None
    }

    /// Re-derives the sequence, drops a menu whose item is gone, and clamps.
    fn settle(&mut self, scroll: &mut dyn ScrollAdapter) {
        let sections = self.sections();
        if let Mode::Menu(menu) = self.mode
            && sections.index_of(menu.item()).is_none()
        {
            self.mode = Mode::Navigate;
        }
        if self.selection.clamp(sections.len()) {
            self.request_scroll(&sections, scroll);
        }
    }

    fn request_scroll(&self, sections: &Sections, scroll: &mut dyn ScrollAdapter) {
        if let Some(request) = ScrollRequest::for_index(sections, self.selection.index()) {
            scroll.scroll_into_view(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Log, NewLog};
    use crate::palette::{Section, Shortcut};
    use crate::repository::LogStore;
    use crate::storage::StorageError;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<ScrollRequest>,
    }

    impl ScrollAdapter for Recorder {
        fn scroll_into_view(&mut self, request: ScrollRequest) {
            self.requests.push(request);
        }
    }

    /// Serves the logs it was built with and rejects every write.
    struct ReadOnlyStore(Vec<Log>);

    impl ReadOnlyStore {
        fn reject() -> crate::storage::Result<()> {
            Err(StorageError::Corrupt("read-only".into()))
        }
    }

    impl LogStore for ReadOnlyStore {
        fn get_all(&self) -> crate::storage::Result<Vec<Log>> {
            Ok(self.0.clone())
        }

        fn insert(&self, _: &Log) -> crate::storage::Result<()> {
            Self::reject()
        }

        fn update(&self, _: &Log) -> crate::storage::Result<()> {
            Self::reject()
        }

        fn delete(&self, _: Uuid) -> crate::storage::Result<()> {
            Self::reject()
        }
    }

    /// One pinned note "Alpha" and one unpinned note "Beta".
    fn alpha_beta() -> (Palette, Uuid, Uuid) {
        let mut repo = LogRepository::in_memory();
        let alpha = repo
            .create(NewLog::note(Some("Alpha"), "first letter").pinned())
            .unwrap();
        let beta = repo
            .create(NewLog::note(Some("Beta"), "second letter"))
            .unwrap();
        (Palette::new(repo), alpha, beta)
    }

    fn press(palette: &mut Palette, keys: &[Key]) -> Option<Intent> {
        let mut rec = Recorder::default();
        let mut last = None;
        for key in keys {
            last = palette.handle_key(*key, &mut rec);
        }
        last
    }

    fn type_text(palette: &mut Palette, text: &str) {
        for c in text.chars() {
            press(palette, &[Key::Char(c)]);
        }
    }

    #[test]
    fn empty_query_lists_shortcuts_then_pinned_then_unpinned() {
        let (palette, alpha, beta) = alpha_beta();
        let sections = palette.sections();

        let items: Vec<SelectableItem> = (0..sections.len())
            .filter_map(|i| sections.get(i))
            .collect();
        assert_eq!(
            items,
            vec![
                SelectableItem::Shortcut(Shortcut::Calendar),
                SelectableItem::Shortcut(Shortcut::Analytics),
                SelectableItem::Shortcut(Shortcut::Settings),
                SelectableItem::Log {
                    id: alpha,
                    section: Section::Pinned,
                },
                SelectableItem::Log {
                    id: beta,
                    section: Section::Unpinned,
                },
            ]
        );
        assert_eq!(palette.selected(), Some(0));
    }

    #[test]
    fn three_downs_then_enter_opens_alpha() {
        let (mut palette, alpha, _) = alpha_beta();
        let intent = press(
            &mut palette,
            &[Key::Down, Key::Down, Key::Down, Key::Enter],
        );

        assert_eq!(palette.selected(), Some(3));
        assert_eq!(intent, Some(Intent::OpenLog(alpha)));
    }

    #[test]
    fn enter_on_shortcut_opens_its_window() {
        let (mut palette, _, _) = alpha_beta();
        let intent = press(&mut palette, &[Key::Down, Key::Down, Key::Enter]);
        assert_eq!(intent, Some(Intent::OpenWindow(Window::Settings)));
    }

    #[test]
    fn down_wraps_after_full_cycle() {
        let (mut palette, _, _) = alpha_beta();
        press(&mut palette, &[Key::Down; 5]);
        assert_eq!(palette.selected(), Some(0));

        press(&mut palette, &[Key::Up]);
        assert_eq!(palette.selected(), Some(4));
    }

    #[test]
    fn arrows_issue_scroll_requests_into_the_right_section() {
        let (mut palette, _, _) = alpha_beta();
        let mut rec = Recorder::default();
        for _ in 0..4 {
            palette.handle_key(Key::Down, &mut rec);
        }

        let sections: Vec<(Section, usize)> =
            rec.requests.iter().map(|r| (r.section, r.offset)).collect();
        assert_eq!(
            sections,
            vec![
                (Section::Navigation, 1),
                (Section::Navigation, 2),
                (Section::Pinned, 0),
                (Section::Unpinned, 0),
            ]
        );
    }

    #[test]
    fn typing_narrows_results_and_keeps_the_index() {
        let (mut palette, _, beta) = alpha_beta();
        press(&mut palette, &[Key::Down, Key::Down, Key::Down]);

        type_text(&mut palette, "bet");

        assert_eq!(palette.query(), "bet");
        assert_eq!(palette.sections().len(), 4);
        assert_eq!(palette.selected(), Some(3));
        assert_eq!(
            palette.selected_item(),
            Some(SelectableItem::Log {
                id: beta,
                section: Section::Unpinned,
            })
        );
    }

    #[test]
    fn shrinking_clamps_to_last_item() {
        let (mut palette, _, _) = alpha_beta();
        press(&mut palette, &[Key::Up]);
        assert_eq!(palette.selected(), Some(4));

        let mut rec = Recorder::default();
        for c in "zzz".chars() {
            palette.handle_key(Key::Char(c), &mut rec);
        }

        assert_eq!(palette.selected(), Some(2));
        assert_eq!(
            rec.requests.last(),
            Some(&ScrollRequest {
                section: Section::Navigation,
                offset: 2,
            })
        );
    }

    #[test]
    fn escape_clears_query_then_closes_window() {
        let (mut palette, _, _) = alpha_beta();
        type_text(&mut palette, "al");

        assert_eq!(press(&mut palette, &[Key::Escape]), None);
        assert_eq!(palette.query(), "");

        assert_eq!(
            press(&mut palette, &[Key::Escape]),
            Some(Intent::CloseWindow(Window::Search))
        );
    }

    #[test]
    fn backspace_widens_results() {
        let (mut palette, _, _) = alpha_beta();
        type_text(&mut palette, "betx");
        assert_eq!(palette.sections().len(), 3);

        press(&mut palette, &[Key::Backspace]);
        assert_eq!(palette.sections().len(), 4);
    }

    #[test]
    fn menu_delete_via_keyboard_removes_beta() {
        let (mut palette, _, beta) = alpha_beta();
        let mut rec = Recorder::default();

        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        assert_eq!(palette.menu().map(ContextMenu::item), Some(beta));

        press(&mut palette, &[Key::Down, Key::Down]);
        assert_eq!(
            palette.selected(),
            Some(0),
            "menu keys must not move selection"
        );

        let intent = press(&mut palette, &[Key::Enter]);

        assert_eq!(intent, None);
        assert!(palette.menu().is_none());
        assert!(palette.repository().get(beta).is_none());
        assert_eq!(palette.sections().len(), 4);
    }

    #[test]
    fn failed_menu_actions_close_menu_and_keep_the_log() {
        let (palette, _, beta) = alpha_beta();
        let logs = palette.repository().all().to_vec();
        let repo = LogRepository::load(ReadOnlyStore(logs)).unwrap();
        let mut palette = Palette::new(repo);
        let mut rec = Recorder::default();

        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        let intent = press(&mut palette, &[Key::Down, Key::Down, Key::Enter]);

        assert_eq!(intent, None);
        assert!(palette.menu().is_none());
        assert!(palette.repository().get(beta).is_some());
        assert_eq!(palette.sections().len(), 5);

        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        press(&mut palette, &[Key::Down, Key::Enter]);

        assert!(palette.menu().is_none());
        assert!(!palette.repository().get(beta).unwrap().pinned);
    }

    #[test]
    fn menu_pin_moves_item_between_sections() {
        let (mut palette, _, beta) = alpha_beta();
        press(&mut palette, &[Key::Down; 4]);
        press(&mut palette, &[Key::BackTab]);
        assert_eq!(palette.menu().map(ContextMenu::item), Some(beta));
        assert_eq!(palette.menu().map(ContextMenu::focused), Some(0));

        press(&mut palette, &[Key::Down, Key::Enter]);

        assert!(palette.repository().get(beta).unwrap().pinned);
        assert_eq!(palette.results().pinned.len(), 2);
        assert!(palette.menu().is_none());
    }

    #[test]
    fn menu_unpin_for_pinned_item() {
        let (mut palette, alpha, _) = alpha_beta();
        press(&mut palette, &[Key::Down; 3]);
        press(&mut palette, &[Key::BackTab]);

        let (_, options) = palette.menu_options().unwrap();
        assert_eq!(options[1], MenuOption::Unpin);

        press(&mut palette, &[Key::Down, Key::Enter]);
        assert!(!palette.repository().get(alpha).unwrap().pinned);
    }

    #[test]
    fn menu_open_returns_open_log() {
        let (mut palette, alpha, _) = alpha_beta();
        press(&mut palette, &[Key::Down; 3]);
        let intent = press(&mut palette, &[Key::BackTab, Key::Enter]);
        assert_eq!(intent, Some(Intent::OpenLog(alpha)));
        assert!(palette.menu().is_none());
    }

    #[test]
    fn menu_focus_wraps_upward() {
        let (mut palette, _, beta) = alpha_beta();
        let mut rec = Recorder::default();
        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        press(&mut palette, &[Key::Up, Key::Enter]);
        assert!(palette.repository().get(beta).is_none());
    }

    #[test]
    fn back_tab_on_shortcut_does_nothing() {
        let (mut palette, _, _) = alpha_beta();
        press(&mut palette, &[Key::BackTab]);
        assert!(palette.menu().is_none());
    }

    #[test]
    fn escape_closes_menu_without_acting() {
        let (mut palette, _, beta) = alpha_beta();
        let mut rec = Recorder::default();
        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);

        let intent = press(&mut palette, &[Key::Down, Key::Escape]);

        assert_eq!(intent, None);
        assert!(palette.menu().is_none());
        assert!(palette.repository().get(beta).is_some());
        assert_eq!(palette.query(), "");
    }

    #[test]
    fn clicking_more_twice_toggles_menu() {
        let (mut palette, alpha, beta) = alpha_beta();
        let mut rec = Recorder::default();

        palette.handle_pointer(Pointer::ClickMore(alpha), &mut rec);
        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        assert_eq!(palette.menu().map(ContextMenu::item), Some(beta));

        palette.handle_pointer(Pointer::ClickMore(beta), &mut rec);
        assert!(palette.menu().is_none());
    }

    #[test]
    fn pointer_down_outside_closes_menu() {
        let (mut palette, alpha, _) = alpha_beta();
        let mut rec = Recorder::default();
        palette.handle_pointer(Pointer::ClickMore(alpha), &mut rec);
        palette.handle_pointer(Pointer::DownOutside, &mut rec);
        assert!(palette.menu().is_none());
    }

    #[test]
    fn clicking_menu_option_runs_it() {
        let (mut palette, alpha, _) = alpha_beta();
        let mut rec = Recorder::default();
        palette.handle_pointer(Pointer::ClickMore(alpha), &mut rec);
        palette.handle_pointer(Pointer::ClickMenuOption(2), &mut rec);

        assert!(palette.repository().get(alpha).is_none());
        assert!(palette.menu().is_none());
    }

    #[test]
    fn clicking_item_returns_its_action() {
        let (mut palette, _, beta) = alpha_beta();
        let mut rec = Recorder::default();
        assert_eq!(
            palette.handle_pointer(Pointer::ClickItem(4), &mut rec),
            Some(Intent::OpenLog(beta))
        );
        assert_eq!(palette.selected(), Some(4));
        assert_eq!(
            palette.handle_pointer(Pointer::ClickItem(9), &mut rec),
            None
        );
        assert_eq!(palette.selected(), Some(4));
    }

    #[test]
    fn typing_while_menu_open_edits_query() {
        let (mut palette, alpha, _) = alpha_beta();
        let mut rec = Recorder::default();
        palette.handle_pointer(Pointer::ClickMore(alpha), &mut rec);

        type_text(&mut palette, "alp");
        assert_eq!(palette.query(), "alp");
        assert_eq!(palette.menu().map(ContextMenu::item), Some(alpha));

        type_text(&mut palette, "x");
        assert!(
            palette.menu().is_none(),
            "menu closes when its item is filtered out"
        );
    }

    #[test]
    fn deleting_selected_last_item_clamps() {
        let (mut palette, _, beta) = alpha_beta();
        press(&mut palette, &[Key::Down; 4]);
        press(
            &mut palette,
            &[Key::BackTab, Key::Down, Key::Down, Key::Enter],
        );

        assert!(palette.repository().get(beta).is_none());
        assert_eq!(palette.selected(), Some(3));
    }

    #[test]
    fn outside_mutation_is_reconciled_by_refresh() {
        let (mut palette, alpha, beta) = alpha_beta();
        press(&mut palette, &[Key::Down; 4]);

        palette.repository_mut().delete(alpha).unwrap();
        palette.repository_mut().delete(beta).unwrap();
        let mut rec = Recorder::default();
        palette.refresh(&mut rec);

        assert_eq!(palette.selected(), Some(2));
        assert_eq!(rec.requests.len(), 1);
    }

    #[test]
    fn sequence_without_shortcuts_or_results_is_inert() {
        let sections = Sections::with_navigation(&[], vec![], vec![]);
        assert_eq!(sections.len(), 0);

        let mut sel = Selection::new();
        assert!(!sel.move_down(sections.len()));
        assert_eq!(
            sel.current(sections.len()).and_then(|i| sections.get(i)),
            None
        );
    }

    #[test]
    fn empty_repository_still_offers_shortcuts() {
        let mut palette = Palette::new(LogRepository::in_memory());
        assert_eq!(palette.sections().len(), 3);
        assert_eq!(
            press(&mut palette, &[Key::Up, Key::Enter]),
            Some(Intent::OpenWindow(Window::Settings))
        );
    }
}
