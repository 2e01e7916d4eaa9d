//! Linear undo/redo log over whole object-sequence snapshots.

use crate::shapes::Shape;

/// Ordered list of committed object sequences plus a cursor.
///
/// The cursor always points at the entry that mirrors the live document.
/// Undo and redo only move the cursor; a commit drops every entry after it
/// before appending.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Shape>>,
    index: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}

impl History {
    /// Create an empty log. `limit` caps the number of retained entries.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Create a log whose first entry is `initial`.
    pub fn seeded(initial: Vec<Shape>, limit: Option<usize>) -> Self {
        let mut history = Self::new(limit);
        history.commit(initial);
        history
    }

    /// Record a new sequence as the present, discarding any redo future.
    pub fn commit(&mut self, sequence: Vec<Shape>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(sequence);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
        self.index = self.entries.len() - 1;
        log::debug!("history commit: {} of {}", self.index + 1, self.entries.len());
    }

    /// Step back one entry and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&[Shape]> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        log::debug!("undo to {} of {}", self.index + 1, self.entries.len());
        self.entries.get(self.index).map(Vec::as_slice)
    }

    /// Step forward one entry and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&[Shape]> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        log::debug!("redo to {} of {}", self.index + 1, self.entries.len());
        self.entries.get(self.index).map(Vec::as_slice)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&[Shape]> {
        self.entries.get(self.index).map(Vec::as_slice)
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{PrimitiveKind, SerializableColor};

    fn rect() -> Shape {
        PrimitiveKind::Rectangle.instantiate(SerializableColor::black())
    }

    #[test]
    fn test_empty_log() {
        let mut history = History::default();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_undo_redo_walk() {
        let a = rect();
        let b = rect();
        let mut history = History::seeded(Vec::new(), None);
        history.commit(vec![a.clone()]);
        history.commit(vec![a.clone(), b.clone()]);
        assert_eq!(history.len(), 3);

        assert_eq!(history.undo().map(<[Shape]>::len), Some(1));
        assert_eq!(history.undo().map(<[Shape]>::len), Some(0));
        assert!(history.undo().is_none());
        assert_eq!(history.index(), 0);

        assert_eq!(history.redo().map(<[Shape]>::len), Some(1));
        assert_eq!(history.redo(), Some(&[a, b][..]));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut history = History::seeded(Vec::new(), None);
        history.commit(vec![rect()]);
        history.commit(vec![rect(), rect()]);
        history.undo();
        history.undo();

        history.commit(vec![rect(), rect(), rect()]);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current().map(<[Shape]>::len), Some(3));
    }

    #[test]
    fn test_identical_commit_still_adds_entry() {
        let shapes = vec![rect()];
        let mut history = History::seeded(shapes.clone(), None);
        history.commit(shapes);
        assert_eq!(history.len(), 2);
        assert!(history.can_undo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::seeded(Vec::new(), Some(3));
        for n in 1..=5 {
            history.commit((0..n).map(|_| rect()).collect());
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().map(<[Shape]>::len), Some(5));
        history.undo();
        history.undo();
        assert_eq!(history.current().map(<[Shape]>::len), Some(3));
        assert!(!history.can_undo());
    }
}
