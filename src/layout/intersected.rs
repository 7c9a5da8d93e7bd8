use smallvec::SmallVec;

use crate::error::ChartResult;
use crate::layout::{LayoutArea, LayoutCache, LayoutContext, LayoutKey, LayoutNode};

/// Node whose area is the overlap of other nodes' areas from this frame.
///
/// The incoming area is only used when there are no sources. Every source must
/// already be calculated when this node runs; a missing one aborts the pass
/// with `MissingArea`.
#[derive(Debug, Clone)]
pub struct IntersectedLayout {
    key: LayoutKey,
    sources: SmallVec<[LayoutKey; 4]>,
}

impl IntersectedLayout {
    #[must_use]
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = LayoutKey>,
    {
        Self {
            key: LayoutKey::next(),
            sources: sources.into_iter().collect(),
        }
    }

    /// Intersection of exactly two nodes, e.g. a column and a row.
    #[must_use]
    pub fn of(first: LayoutKey, second: LayoutKey) -> Self {
        Self::new([first, second])
    }

    #[must_use]
    pub fn sources(&self) -> &[LayoutKey] {
        &self.sources
    }
}

impl LayoutNode for IntersectedLayout {
    fn key(&self) -> LayoutKey {
        self.key
    }

    fn calculate(
        &self,
        _context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()> {
        let mut result: Option<LayoutArea> = None;
        for source in &self.sources {
            let next = cache.area(*source)?;
            result = Some(match result {
                Some(current) => current.intersect(&next),
                None => next,
            });
        }

        // With no sources the node simply takes the area it was given.
        cache.set_area(self.key, result.unwrap_or(area));
        Ok(())
    }
}
