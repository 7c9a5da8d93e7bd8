use tracing::trace;

use crate::error::ChartResult;
use crate::layout::{LayoutArea, LayoutCache, LayoutContext, LayoutKey, LayoutNode};

/// Plain container: every child receives the cell's full area.
///
/// Cells are the slots handed out by linear and table layouts, and the place
/// where dependent nodes (e.g. intersections) are attached.
#[derive(Debug)]
pub struct LayoutCell {
    key: LayoutKey,
    children: Vec<Box<dyn LayoutNode>>,
}

impl Default for LayoutCell {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCell {
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: LayoutKey::next(),
            children: Vec::new(),
        }
    }

    /// Appends a child and returns its key.
    ///
    /// Children are calculated in insertion order, so a node that reads other
    /// areas must be added after the nodes that produce them.
    pub fn add_layout<N: LayoutNode + 'static>(&mut self, node: N) -> LayoutKey {
        let key = node.key();
        self.children.push(Box::new(node));
        key
    }

    /// Removes all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl LayoutNode for LayoutCell {
    fn key(&self) -> LayoutKey {
        self.key
    }

    fn calculate(
        &self,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()> {
        cache.set_area(self.key, area);
        for child in &self.children {
            child.calculate(context, cache, area)?;
        }
        if !self.children.is_empty() {
            trace!(key = %self.key, children = self.children.len(), "calculated layout cell");
        }
        Ok(())
    }
}
