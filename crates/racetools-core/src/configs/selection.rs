//! Comparison selection
//!
//! Ordered set of configuration ids picked for side-by-side comparison.

use serde::{Deserialize, Serialize};

use super::{SavedConfiguration, MAX_COMPARED};

/// Configurations chosen for comparison, in the order they were picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    ids: Vec<String>,
}

impl ComparisonSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect `id`. Returns whether it is selected afterwards.
    ///
    /// Selecting beyond [`MAX_COMPARED`] entries is ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.select(id)
        }
    }

    /// Add `id` if there is room. Returns whether it is selected afterwards.
    pub fn select(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return true;
        }
        if self.ids.len() >= MAX_COMPARED {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Drop `id` from the selection (used when a configuration is deleted)
    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|selected| selected != id);
    }

    /// Whether `id` is selected
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Look up the selected configurations, in selection order.
    ///
    /// Ids with no matching configuration are skipped.
    pub fn resolve(&self, configs: &[SavedConfiguration]) -> Vec<SavedConfiguration> {
        self.ids
            .iter()
            .filter_map(|id| configs.iter().find(|c| &c.id == id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_caps_at_four() {
        let mut selection = ComparisonSelection::new();
        for id in ["a", "b", "c", "d"] {
            assert!(selection.toggle(id));
        }
        assert!(!selection.toggle("e"));
        assert_eq!(selection.len(), 4);

        assert!(!selection.toggle("b"));
        assert!(selection.toggle("e"));
        assert_eq!(selection.ids(), &["a", "c", "d", "e"]);
    }
}
