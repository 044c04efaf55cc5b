//! Undo/redo over whole-document snapshots.
//!
//! Every committed edit records the state it replaced. Undo and redo swap the
//! current state with the top of the opposite stack, so any snapshot type
//! that can be cloned works. Derived updates such as a relayout after a size
//! change never pass through here.

use crate::constants::MAX_UNDO_HISTORY;

/// Linear undo/redo stacks of full snapshots.
#[derive(Debug, Clone)]
pub struct UndoHistory<S> {
    /// Snapshots that can be restored by undo, most recent last
    past: Vec<S>,
    /// Snapshots that can be restored by redo, next one last
    future: Vec<S>,
    /// Oldest entries are dropped beyond this length
    limit: usize,
}

impl<S> Default for UndoHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> UndoHistory<S> {
    /// Creates a new empty history with the default size limit.
    pub fn new() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }

    /// Creates a new empty history keeping at most `limit` undo entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records the state an edit is about to replace.
    ///
    /// This clears the redo stack since a new edit invalidates any previously undone ones.
    ///
    /// # Arguments
    ///
    /// * `previous` - The pre-mutation state
    pub fn commit(&mut self, previous: S) {
        self.past.push(previous);
        self.future.clear();

        if self.past.len() > self.limit {
            self.past.remove(0);
        }
    }

    /// Returns true if there are edits that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are edits that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries held.
    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo entries held.
    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl<S: Clone> UndoHistory<S> {
    /// Steps back one edit.
    ///
    /// # Returns
    ///
    /// The state to make current, or `None` (a no-op) if there is nothing to undo.
    /// On success `current` is saved for redo.
    pub fn undo(&mut self, current: &S) -> Option<S> {
        let restored = self.past.pop()?;
        self.future.push(current.clone());
        Some(restored)
    }

    /// Steps forward one undone edit.
    ///
    /// # Returns
    ///
    /// The state to make current, or `None` (a no-op) if there is nothing to redo.
    /// On success `current` is saved for undo.
    pub fn redo(&mut self, current: &S) -> Option<S> {
        let restored = self.future.pop()?;
        self.past.push(current.clone());
        Some(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = UndoHistory::new();
        let s = vec![1];
        let s_prime = vec![1, 2];
        history.commit(s.clone());

        let undone = history.undo(&s_prime).unwrap();
        assert_eq!(undone, s);
        let redone = history.redo(&undone).unwrap();
        assert_eq!(redone, s_prime);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history: UndoHistory<u32> = UndoHistory::new();
        assert_eq!(history.undo(&7), None);
        assert_eq!(history.redo(&7), None);
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = UndoHistory::new();
        history.commit(0);
        assert_eq!(history.undo(&1), Some(0));
        assert!(history.can_redo());
        history.commit(0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_multiple_steps() {
        let mut history = UndoHistory::new();
        history.commit("a");
        history.commit("b");
        assert_eq!(history.undo(&"c"), Some("b"));
        assert_eq!(history.undo(&"b"), Some("a"));
        assert_eq!(history.undo(&"a"), None);
        assert_eq!(history.redo(&"a"), Some("b"));
        assert_eq!(history.redo(&"b"), Some("c"));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = UndoHistory::with_limit(2);
        history.commit(1);
        history.commit(2);
        history.commit(3);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(&4), Some(3));
        assert_eq!(history.undo(&3), Some(2));
        assert_eq!(history.undo(&2), None);
    }

    #[test]
    fn test_clear() {
        let mut history = UndoHistory::new();
        history.commit(1);
        history.clear();
        assert!(!history.can_undo());
    }
}
