//! Scroll-into-view requests, kept apart from the selection math.

use super::{Section, Sections};

/// Bring the `offset`-th element of `section` into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub section: Section,
    pub offset: usize,
}

impl ScrollRequest {
    /// The request for the element at `index` of the sequence.
    pub fn for_index(sections: &Sections, index: usize) -> Option<Self> {
        let (section, offset) = sections.locate(index)?;
        Some(Self { section, offset })
    }
}

/// Whatever renders the palette and owns its viewport.
///
/// Implementations scroll smoothly and only as far as the nearest edge,
/// so holding an arrow key down never makes the viewport jump.
pub trait ScrollAdapter {
    fn scroll_into_view(&mut self, request: ScrollRequest);
}
