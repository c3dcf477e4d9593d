/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;

/// Canonical element-selection state.
///
/// This wraps the selected-id set with explicit metadata so consumers can
/// reason about selection changes deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    ids: HashSet<String>,
    order: Vec<String>,
    primary: Option<String>,
    revision: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic revision incremented whenever the selection changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Primary selected element (most recently selected).
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Plain select replaces the selection with `id`; multi-select toggles it.
    pub fn select(&mut self, id: &str, multi_select: bool) {
        if multi_select {
            self.toggle(id);
            return;
        }
        if self.ids.len() == 1 && self.ids.contains(id) {
            return;
        }
        self.ids.clear();
        self.order.clear();
        self.ids.insert(id.to_string());
        self.order.push(id.to_string());
        self.primary = Some(id.to_string());
        self.bump();
    }

    pub fn toggle(&mut self, id: &str) {
        if self.ids.remove(id) {
            self.order.retain(|existing| existing != id);
            self.primary = self.order.last().cloned();
        } else {
            self.ids.insert(id.to_string());
            self.order.push(id.to_string());
            self.primary = Some(id.to_string());
        }
        self.bump();
    }

    /// Replace the selection with `ids`, keeping first-seen order.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids.clear();
        self.order.clear();
        for id in ids {
            if self.ids.insert(id.clone()) {
                self.order.push(id);
            }
        }
        self.primary = self.order.last().cloned();
        self.bump();
    }

    pub fn clear(&mut self) {
        if self.ids.is_empty() && self.primary.is_none() {
            return;
        }
        self.ids.clear();
        self.order.clear();
        self.primary = None;
        self.bump();
    }

    /// Drop every selected id for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        if self.ids.len() == before {
            return;
        }
        let ids = &self.ids;
        self.order.retain(|id| ids.contains(id));
        self.primary = self.order.last().cloned();
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}
