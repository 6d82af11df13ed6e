//! Bounded undo/redo history of structural edits.

use std::{collections::VecDeque, num::NonZero};

/// A bounded list of edit records with an undo/redo cursor.
///
/// The cursor counts the edits currently applied to the grid. Pushing a new
/// edit discards any redoable tail; exceeding the capacity drops the oldest
/// edit.
#[derive(Debug, Clone)]
pub(crate) struct EditList<E> {
    edits: VecDeque<E>,
    capacity: NonZero<usize>,
    cursor: usize,
}

impl<E> EditList<E> {
    pub(crate) fn new(capacity: NonZero<usize>) -> Self {
        Self {
            edits: VecDeque::new(),
            capacity,
            cursor: 0,
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.cursor < self.edits.len()
    }

    pub(crate) fn push(&mut self, edit: E) {
        self.edits.truncate(self.cursor);
        if self.edits.len() == self.capacity.get() {
            self.edits.pop_front();
            self.cursor -= 1;
        }
        self.edits.push_back(edit);
        self.cursor += 1;
    }
}

impl<E: Clone> EditList<E> {
    /// Steps the cursor back and returns the edit to revert, if any.
    pub(crate) fn undo(&mut self) -> Option<E> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.edits.get(self.cursor).cloned()
    }

    /// Steps the cursor forward and returns the edit to reapply, if any.
    pub(crate) fn redo(&mut self) -> Option<E> {
        if !self.can_redo() {
            return None;
        }
        let edit = self.edits.get(self.cursor).cloned();
        self.cursor += 1;
        edit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(capacity: usize) -> EditList<u32> {
        EditList::new(NonZero::new(capacity).unwrap())
    }

    #[test]
    fn undo_redo_walk_the_cursor() {
        let mut edits = list(10);
        edits.push(1);
        edits.push(2);
        edits.push(3);

        assert_eq!(edits.undo(), Some(3));
        assert_eq!(edits.undo(), Some(2));
        assert_eq!(edits.redo(), Some(2));
        assert_eq!(edits.redo(), Some(3));
        assert_eq!(edits.redo(), None);

        assert_eq!(edits.undo(), Some(3));
        assert_eq!(edits.undo(), Some(2));
        assert_eq!(edits.undo(), Some(1));
        assert_eq!(edits.undo(), None);
    }

    #[test]
    fn push_discards_redoable_tail() {
        let mut edits = list(10);
        edits.push(1);
        edits.push(2);
        edits.push(3);

        assert_eq!(edits.undo(), Some(3));
        assert_eq!(edits.undo(), Some(2));
        edits.push(4);

        assert!(!edits.can_redo());
        assert_eq!(edits.undo(), Some(4));
        assert_eq!(edits.redo(), Some(4));
    }

    #[test]
    fn capacity_drops_oldest_edit() {
        let mut edits = list(3);
        edits.push(1);
        edits.push(2);
        edits.push(3);
        edits.push(4);

        assert_eq!(edits.undo(), Some(4));
        assert_eq!(edits.undo(), Some(3));
        assert_eq!(edits.undo(), Some(2));
        assert_eq!(edits.undo(), None);
    }

    #[test]
    fn empty_list_has_nothing_to_do() {
        let mut edits = list(5);
        assert!(!edits.can_undo());
        assert!(!edits.can_redo());
        assert_eq!(edits.undo(), None);
        assert_eq!(edits.redo(), None);
    }
}
