//! What can be selected in the palette, and where it lives.

use uuid::Uuid;

use crate::search::SearchResults;

/// Named windows the host shell can open or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Search,
    Calendar,
    Analytics,
    Settings,
}

impl Window {
    pub fn name(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Calendar => "calendar",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
        }
    }
}

/// What the palette asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    OpenWindow(Window),
    CloseWindow(Window),
    /// Show the detail view of a log.
    OpenLog(Uuid),
}

/// Fixed navigation buttons at the top of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Calendar,
    Analytics,
    Settings,
}

impl Shortcut {
    pub const ALL: [Self; 3] = [Self::Calendar, Self::Analytics, Self::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Self::Calendar => "Calendar",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
        }
    }

    pub fn window(self) -> Window {
        match self {
            Self::Calendar => Window::Calendar,
            Self::Analytics => Window::Analytics,
            Self::Settings => Window::Settings,
        }
    }
}

/// One of the three groups laid end to end to form the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Navigation,
    Pinned,
    Unpinned,
}

impl Section {
    /// Heading shown above the section, if it has one.
    pub fn heading(self) -> Option<&'static str> {
        match self {
            Self::Navigation => None,
            Self::Pinned => Some("Pinned"),
            Self::Unpinned => Some("All logs"),
        }
    }
}

/// An entry of the selectable sequence.
///
/// Rebuilt from the current results every time; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectableItem {
    Shortcut(Shortcut),
    Log { id: Uuid, section: Section },
}

impl SelectableItem {
    /// What pressing Enter on this item does.
    pub fn action(self) -> Intent {
        match self {
            Self::Shortcut(s) => Intent::OpenWindow(s.window()),
            Self::Log { id, .. } => Intent::OpenLog(id),
        }
    }

    pub fn log_id(self) -> Option<Uuid> {
        match self {
            Self::Shortcut(_) => None,
            Self::Log { id, .. } => Some(id),
        }
    }
}

/// The sequence `navigation ++ pinned ++ unpinned`, by id.
///
/// Owns its ids so it can outlive the search results it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    navigation: &'static [Shortcut],
    pinned: Vec<Uuid>,
    unpinned: Vec<Uuid>,
}

impl Sections {
    pub fn new(pinned: Vec<Uuid>, unpinned: Vec<Uuid>) -> Self {
        Self::with_navigation(&Shortcut::ALL, pinned, unpinned)
    }

    pub fn with_navigation(
        navigation: &'static [Shortcut],
        pinned: Vec<Uuid>,
        unpinned: Vec<Uuid>,
    ) -> Self {
        Self {
            navigation,
            pinned,
            unpinned,
        }
    }

    pub fn from_results(results: &SearchResults<'_>) -> Self {
        Self::new(results.pinned_ids(), results.unpinned_ids())
    }

    pub fn len(&self) -> usize {
        self.navigation.len() + self.pinned.len() + self.unpinned.len()
    }

    /// Which section `index` falls in, and its offset within that section.
    pub fn locate(&self, index: usize) -> Option<(Section, usize)> {
        let nav = self.navigation.len();
        let pinned_end = nav + self.pinned.len();
        if index < nav {
            Some((Section::Navigation, index))
        } else if index < pinned_end {
            Some((Section::Pinned, index - nav))
        } else if index < self.len() {
            Some((Section::Unpinned, index - pinned_end))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<SelectableItem> {
        let (section, offset) = self.locate(index)?;
        Some(match section {
            Section::Navigation => SelectableItem::Shortcut(self.navigation[offset]),
            Section::Pinned => SelectableItem::Log {
                id: self.pinned[offset],
                section,
            },
            Section::Unpinned => SelectableItem::Log {
                id: self.unpinned[offset],
                section,
            },
        })
    }

    /// Position of a log in the sequence.
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        let nav = self.navigation.len();
        if let Some(i) = self.pinned.iter().position(|p| *p == id) {
            return Some(nav + i);
        }
        self.unpinned
            .iter()
            .position(|u| *u == id)
            .map(|i| nav + self.pinned.len() + i)
    }
}
