//! Bounded undo/redo stacks of whole-tree clones.
//!
//! # Invariants
//!
//! 1. `past.len() <= limit` after every operation
//! 2. The future stack is cleared whenever a new state is recorded
//! 3. Stored trees never share nodes with the live tree (they are clones)
//!
//! ```text
//! record(t3)
//! ┌──────────────────────────────┐
//! │ past:   [t1, t2, t3]         │
//! │ future: []                   │
//! └──────────────────────────────┘
//!
//! undo(t4) -> t3
//! ┌──────────────────────────────┐
//! │ past:   [t1, t2]             │
//! │ future: [t4]                 │
//! └──────────────────────────────┘
//!
//! record(t5)  <-- new branch, clears future
//! ┌──────────────────────────────┐
//! │ past:   [t1, t2, t5]         │
//! │ future: []                   │
//! └──────────────────────────────┘
//! ```

use std::collections::VecDeque;

use crate::tree::Tree;

/// Default maximum number of undoable states.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Undo/redo stacks with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Tree>,
    future: Vec<Tree>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create empty stacks keeping at most `limit` past states.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the depth limit, evicting the oldest states if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Push a pre-mutation state. Invalidates everything redoable.
    pub fn record(&mut self, snapshot: Tree) {
        self.future.clear();
        self.past.push_back(snapshot);
        self.enforce_limit();
    }

    /// Step back: returns the most recent past state and parks `current` on
    /// the future stack.
    pub fn undo(&mut self, current: &Tree) -> Option<Tree> {
        let previous = self.past.pop_back()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: &Tree) -> Option<Tree> {
        let next = self.future.pop()?;
        self.past.push_back(current.clone());
        self.enforce_limit();
        Some(next)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    fn enforce_limit(&mut self) {
        let mut evicted = 0usize;
        while self.past.len() > self.limit {
            self.past.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            tracing::trace!(evicted, limit = self.limit, "layout history evicted oldest states");
        }
    }
}
