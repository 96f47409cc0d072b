//! Per-item context menu: Open, Pin or Unpin, Delete.

use uuid::Uuid;

/// Number of entries every context menu has.
pub const OPTION_COUNT: usize = 3;

/// An entry of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Open,
    Pin,
    Unpin,
    Delete,
}

impl MenuOption {
    /// The entries for an item, in display order.
    pub fn for_item(pinned: bool) -> [Self; OPTION_COUNT] {
        if pinned {
            [Self::Open, Self::Unpin, Self::Delete]
        } else {
            [Self::Open, Self::Pin, Self::Delete]
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Pin => "Pin",
            Self::Unpin => "Unpin",
            Self::Delete => "Delete",
        }
    }

    /// Accelerator hint rendered beside the label.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Open => "⏎",
            Self::Pin | Self::Unpin => "⏎ P",
            Self::Delete => "⏎ D",
        }
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }
}

/// An open context menu: which item it belongs to and which entry has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    item: Uuid,
    focused: usize,
}

impl ContextMenu {
    /// Opens on `item` with the first entry focused.
    pub fn open(item: Uuid) -> Self {
        Self { item, focused: 0 }
    }

    pub fn item(&self) -> Uuid {
        self.item
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % OPTION_COUNT;
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + OPTION_COUNT - 1) % OPTION_COUNT;
    }

    /// The focused entry, given the item's current pin state.
    pub fn focused_option(&self, pinned: bool) -> MenuOption {
        MenuOption::for_item(pinned)[self.focused]
    }
}
