//! Row selection state.

use std::collections::HashSet;
use std::hash::Hash;

/// Ephemeral multi-row selection, keyed by record id.
///
/// Selection never outlives a bulk action: the views clear it whenever a
/// delete completes.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Toggle selection for a key.
    pub fn toggle(&mut self, key: K) {
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Returns `true` if every key in `keys` is selected and `keys` is
    /// non-empty.
    pub fn all_selected<'a>(&self, keys: impl IntoIterator<Item = &'a K>) -> bool
    where
        K: 'a,
    {
        let mut any = false;
        for key in keys {
            if !self.selected.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Toggle a whole page: if every given key is already selected they are
    /// all deselected, otherwise they are all selected.
    pub fn toggle_all(&mut self, keys: Vec<K>) {
        if self.all_selected(keys.iter()) {
            for key in &keys {
                self.selected.remove(key);
            }
        } else {
            self.selected.extend(keys);
        }
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// All selected keys, in arbitrary order.
    pub fn keys(&self) -> Vec<K> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        selection.toggle(1);
        assert!(selection.is_selected(&1));
        selection.toggle(1);
        assert!(!selection.is_selected(&1));
    }

    #[test]
    fn test_toggle_all_flips_between_none_and_all() {
        let mut selection = Selection::new();
        selection.toggle_all(vec![1, 2, 3]);
        assert_eq!(selection.len(), 3);

        selection.toggle_all(vec![1, 2, 3]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_completes_a_partial_selection() {
        let mut selection = Selection::new();
        selection.toggle(2);
        selection.toggle_all(vec![1, 2, 3]);
        assert_eq!(selection.len(), 3);
    }
}
