//! Keyboard navigation over the current suggestion list

/// Highlighted row, or no selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    selected: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Move down, stopping at the last of `len` rows
    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Move up; stepping past the first row clears the selection
    pub fn move_up(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn reset(&mut self) {
        self.selected = None;
    }
}
