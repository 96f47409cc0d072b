//! Selection math over the flattened sequence.
//!
//! Pure index arithmetic: the caller passes the current sequence length
//! each time, so nothing here goes stale when results change.

/// A single index into the selectable sequence.
///
/// The index is only ever clamped when the sequence shrinks, never reset,
/// so the cursor stays where it was whenever it still can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw index. Meaningless while the sequence is empty.
    pub fn index(self) -> usize {
        self.index
    }

    /// The selected position, or `None` when there is nothing to select.
    pub fn current(self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    /// Moves down one, wrapping to the top. Returns whether the index changed.
    pub fn move_down(&mut self, len: usize) -> bool {
        let Some(current) = self.current(len) else {
            return false;
        };
        self.set((current + 1) % len)
    }

    /// Moves up one, wrapping to the bottom. Returns whether the index changed.
    pub fn move_up(&mut self, len: usize) -> bool {
        let Some(current) = self.current(len) else {
            return false;
        };
        self.set((current + len - 1) % len)
    }

    /// Selects `index` if it is in range. Returns whether the index changed.
    pub fn select(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.set(index)
    }

    /// Pulls the index back into `0..len`. Returns whether it changed.
    ///
    /// An empty sequence parks the index at zero.
    pub fn clamp(&mut self, len: usize) -> bool {
        self.set(self.index.min(len.saturating_sub(1)))
    }

    fn set(&mut self, index: usize) -> bool {
        let changed = self.index != index;
        self.index = index;
        changed
    }
}
