use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};
use crate::layout::{LayoutArea, LayoutKey};

/// Areas computed during the current frame, keyed by node.
///
/// The cache is cleared at the start of every frame. Reading a key that has
/// not been written yet is an error: it means a node depends on another node
/// that is calculated later in the tree.
#[derive(Debug, Default, Clone)]
pub struct LayoutCache {
    areas: IndexMap<LayoutKey, LayoutArea>,
    extents: IndexMap<LayoutKey, f64>,
}

impl LayoutCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry of the previous frame.
    pub fn clear(&mut self) {
        self.areas.clear();
        self.extents.clear();
    }

    pub fn set_area(&mut self, key: LayoutKey, area: LayoutArea) {
        self.areas.insert(key, area);
    }

    pub fn area(&self, key: LayoutKey) -> ChartResult<LayoutArea> {
        self.areas
            .get(&key)
            .copied()
            .ok_or(ChartError::MissingArea { key })
    }

    #[must_use]
    pub fn has_area(&self, key: LayoutKey) -> bool {
        self.areas.contains_key(&key)
    }

    /// Memoizes a scalar measurement (e.g. a table's widest fixed row).
    pub fn set_extent(&mut self, key: LayoutKey, extent: f64) {
        self.extents.insert(key, extent);
    }

    #[must_use]
    pub fn extent(&self, key: LayoutKey) -> Option<f64> {
        self.extents.get(&key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Areas in the order they were written this frame.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutKey, LayoutArea)> + '_ {
        self.areas.iter().map(|(key, area)| (*key, *area))
    }
}
