//! Bounded undo/redo history.
//!
//! State is a list `[r0, r1, ..., rn]` of snapshots plus a cursor `i`
//! (`0 <= i <= n`). Commits truncate everything after the cursor; overflow
//! evicts from the front and shifts the cursor. Undo/redo only move the cursor.

use std::collections::VecDeque;

/// Default bound on retained snapshots.
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Seed with `initial`; `capacity` is clamped to at least 1.
    pub fn new(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    /// Record `value` after the cursor. Returns `true` if the oldest entry was
    /// evicted to stay within capacity.
    pub fn commit(&mut self, value: T) -> bool {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(value);
        self.cursor = self.entries.len() - 1;
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor -= 1;
            return true;
        }
        false
    }

    /// Step back; `None` (and no change) at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward; `None` (and no change) at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_the_cursor() {
        let mut h = History::new(0, 10);
        assert!(!h.can_undo() && !h.can_redo());
        h.commit(1);
        h.commit(2);
        assert_eq!(h.undo(), Some(&1));
        assert_eq!(h.undo(), Some(&0));
        assert_eq!(h.undo(), None);
        assert_eq!(h.cursor(), 0);
        assert_eq!(h.redo(), Some(&1));
        assert_eq!(h.redo(), Some(&2));
        assert_eq!(h.redo(), None);
        assert_eq!(*h.current(), 2);
    }

    #[test]
    fn commit_truncates_redo_tail() {
        let mut h = History::new(0, 10);
        h.commit(1);
        h.commit(2);
        h.undo();
        h.undo();
        h.commit(7);
        assert_eq!(h.iter().copied().collect::<Vec<_>>(), vec![0, 7]);
        assert!(!h.can_redo());
    }

    #[test]
    fn sixty_commits_keep_fifty_entries() {
        let mut h = History::new(0, DEFAULT_CAPACITY);
        let mut evicted = 0;
        for k in 1..=60 {
            if h.commit(k) {
                evicted += 1;
            }
        }
        assert_eq!(h.len(), 50);
        assert_eq!(evicted, 11);
        assert_eq!(*h.current(), 60);
        for _ in 0..49 {
            assert!(h.undo().is_some());
        }
        assert_eq!(*h.current(), 11);
        assert_eq!(h.undo(), None);
        assert_eq!(*h.current(), 11);
    }

    #[test]
    fn capacity_is_at_least_one() {
        let mut h = History::new("a", 0);
        h.commit("b");
        assert_eq!(h.len(), 1);
        assert_eq!(*h.current(), "b");
        assert!(!h.can_undo());
    }
}
