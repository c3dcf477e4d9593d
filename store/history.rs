/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bounded undo/redo stacks of whole-state snapshots.

/// Default number of undo steps kept.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Past/future snapshot stacks.
///
/// `past` is bounded (oldest evicted first); `future` is unbounded but is
/// cleared by every new snapshot, so history never branches.
#[derive(Debug, Clone)]
pub struct History<S> {
    past: Vec<S>,
    future: Vec<S>,
    max_depth: usize,
}

impl<S> History<S> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth,
        }
    }

    /// Record the state as it was before a mutation.
    pub fn snapshot(&mut self, state: S) {
        self.past.push(state);
        self.trim();
        self.future.clear();
    }

    /// Step back: `current` moves to the future stack and the newest past
    /// entry is returned. `None` at the boundary.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: symmetric to [`History::undo`].
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.future.pop()?;
        self.past.push(current);
        self.trim();
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the bound; excess past entries are evicted oldest-first.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.trim();
    }

    /// Oldest retained past entry.
    pub fn oldest(&self) -> Option<&S> {
        self.past.first()
    }

    fn trim(&mut self) {
        if self.past.len() > self.max_depth {
            let excess = self.past.len() - self.max_depth;
            self.past.drain(0..excess);
        }
    }
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
