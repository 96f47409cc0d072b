//! The search palette: keyboard-first navigation over shortcuts and logs.
//!
//! The selectable sequence is three sections laid end to end:
//!
//! ```text
//! [ navigation shortcuts | pinned results | unpinned results ]
//!   0 ..                   |N| ..           |N|+|P| ..
//! ```
//!
//! One index moves over that sequence ([`Selection`]). A per-item context
//! menu ([`ContextMenu`]) can take over the same keys while it is open.
//! [`Palette`] decides which of the two owns each key event.

mod controller;
mod item;
mod menu;
mod scroll;
mod selection;

pub use controller::{Key, Palette, Pointer};
pub use item::{Intent, Section, Sections, SelectableItem, Shortcut, Window};
pub use menu::{ContextMenu, MenuOption};
pub use scroll::{ScrollAdapter, ScrollRequest};
pub use selection::Selection;
