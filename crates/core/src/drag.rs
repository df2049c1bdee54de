//! Pointer-drag reordering as a three-phase gesture.
//!
//! `start` records the source row, `hover` tracks the candidate target as
//! the pointer moves, and `finish` commits a single [`Roster::reorder`].
//! Nothing touches the roster until `finish`.

use crate::roster::Roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    from: usize,
    over: Option<usize>,
}

impl DragSession {
    pub fn start(from: usize) -> Self {
        Self { from, over: None }
    }

    /// Index of the row being dragged.
    pub fn source(&self) -> usize {
        self.from
    }

    /// Current candidate target, if the pointer has entered a row.
    pub fn target(&self) -> Option<usize> {
        self.over
    }

    pub fn hover(&mut self, index: usize) {
        self.over = Some(index);
    }

    /// Pointer left every row; ending now would not move anything.
    pub fn leave(&mut self) {
        self.over = None;
    }

    /// End the gesture and apply the move. Returns whether the roster changed.
    pub fn finish(self, roster: &mut Roster) -> bool {
        match self.over {
            Some(to) if to != self.from => roster.reorder(self.from, to),
            _ => false,
        }
    }
}
