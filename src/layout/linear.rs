use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::Size;
use crate::error::{ChartError, ChartResult};
use crate::layout::{
    ContentMeasure, LayoutArea, LayoutCache, LayoutCell, LayoutContext, LayoutKey, LayoutNode,
    ScreenLength,
};

/// Axis along which a container partitions its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Children side by side, left to right.
    Horizontal,
    /// Children stacked, top to bottom.
    Vertical,
}

impl Direction {
    #[must_use]
    pub fn extent(self, area: &LayoutArea) -> f64 {
        match self {
            Self::Horizontal => area.width,
            Self::Vertical => area.height,
        }
    }

    #[must_use]
    pub fn measured(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    fn origin(self, area: &LayoutArea) -> f64 {
        match self {
            Self::Horizontal => area.left,
            Self::Vertical => area.top,
        }
    }

    fn slice(self, area: &LayoutArea, start: f64, size: f64) -> LayoutArea {
        match self {
            Self::Horizontal => LayoutArea::new(start, area.top, size, area.height),
            Self::Vertical => LayoutArea::new(area.left, start, area.width, size),
        }
    }
}

/// One slot of a linear container.
#[derive(Debug)]
pub(crate) enum LinearChild {
    /// Sized by the sum of its providers' measurements.
    Fixed {
        cell: LayoutCell,
        providers: Vec<Rc<dyn ContentMeasure>>,
    },
    /// Sized by a weighted share of the space left after fixed children.
    Relative { cell: LayoutCell, weight: f64 },
}

impl LinearChild {
    fn cell(&self) -> &LayoutCell {
        match self {
            Self::Fixed { cell, .. } | Self::Relative { cell, .. } => cell,
        }
    }

    fn cell_mut(&mut self) -> &mut LayoutCell {
        match self {
            Self::Fixed { cell, .. } | Self::Relative { cell, .. } => cell,
        }
    }
}

/// Sums the measurements of `providers` along `direction`, in normalized units.
pub(crate) fn measure_providers(
    providers: &[Rc<dyn ContentMeasure>],
    direction: Direction,
    context: &LayoutContext,
) -> f64 {
    providers
        .iter()
        .map(|provider| {
            let pixels = direction.measured(provider.measure(context));
            ScreenLength::Pixels(pixels).to_normalized(context)
        })
        .sum()
}

/// Ordered fixed/relative children plus the partition algorithm shared by
/// linear layouts and table rows.
#[derive(Debug)]
pub(crate) struct LinearChildren {
    direction: Direction,
    items: Vec<LinearChild>,
}

impl LinearChildren {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            direction,
            items: Vec::new(),
        }
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn push_fixed(&mut self, providers: Vec<Rc<dyn ContentMeasure>>) -> &mut LayoutCell {
        self.items.push(LinearChild::Fixed {
            cell: LayoutCell::new(),
            providers,
        });
        let last = self.items.len() - 1;
        self.items[last].cell_mut()
    }

    pub(crate) fn push_relative(&mut self, weight: f64, add_to_start: bool) -> &mut LayoutCell {
        let child = LinearChild::Relative {
            cell: LayoutCell::new(),
            weight,
        };
        let index = if add_to_start {
            self.items.insert(0, child);
            0
        } else {
            self.items.push(child);
            self.items.len() - 1
        };
        self.items[index].cell_mut()
    }

    /// Total size of the fixed children, in normalized units.
    pub(crate) fn fixed_extent(&self, context: &LayoutContext) -> f64 {
        self.items
            .iter()
            .map(|item| match item {
                LinearChild::Fixed { providers, .. } => {
                    measure_providers(providers, self.direction, context)
                }
                LinearChild::Relative { .. } => 0.0,
            })
            .sum()
    }

    /// Partitions `area` among the children and calculates each of them.
    ///
    /// `reserved_fixed` is a lower bound for the fixed region; any difference
    /// to the children's own fixed size is inserted as leading space.
    pub(crate) fn arrange(
        &self,
        owner: LayoutKey,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
        reserved_fixed: f64,
    ) -> ChartResult<()> {
        let mut sizes: SmallVec<[f64; 8]> = SmallVec::with_capacity(self.items.len());
        let mut total_fixed = 0.0;
        let mut total_weight = 0.0;
        let mut has_relative = false;

        for item in &self.items {
            match item {
                LinearChild::Fixed { providers, .. } => {
                    let size = measure_providers(providers, self.direction, context);
                    total_fixed += size;
                    sizes.push(size);
                }
                LinearChild::Relative { weight, .. } => {
                    if !weight.is_finite() || *weight < 0.0 {
                        return Err(ChartError::InvalidLayout(format!(
                            "relative weight of {} must be finite and >= 0, got {weight}",
                            item.cell().key()
                        )));
                    }
                    has_relative = true;
                    total_weight += weight;
                    sizes.push(*weight);
                }
            }
        }

        if has_relative && total_weight <= 0.0 {
            return Err(ChartError::InvalidLayout(format!(
                "layout {owner} has relative children but their weights sum to zero"
            )));
        }

        let leading = (reserved_fixed - total_fixed).max(0.0);
        let total_fixed = total_fixed.max(reserved_fixed);
        let remaining = (self.direction.extent(&area) - total_fixed).max(0.0);

        let mut position = self.direction.origin(&area) + leading;
        for (item, measured) in self.items.iter().zip(sizes) {
            let size = match item {
                LinearChild::Fixed { .. } => measured,
                LinearChild::Relative { .. } => remaining * measured / total_weight,
            };
            let slot = self.direction.slice(&area, position, size);
            item.cell().calculate(context, cache, slot)?;
            position += size;
        }

        trace!(
            key = %owner,
            direction = ?self.direction,
            children = self.items.len(),
            total_fixed,
            remaining,
            "arranged linear children"
        );
        Ok(())
    }
}

/// Horizontal or vertical container of fixed (content-sized) and relative
/// (weighted) cells.
#[derive(Debug)]
pub struct LinearLayout {
    key: LayoutKey,
    padding: Option<ScreenLength>,
    children: LinearChildren,
}

impl LinearLayout {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            key: LayoutKey::next(),
            padding: None,
            children: LinearChildren::new(direction),
        }
    }

    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Shrinks the incoming area by `padding` on every side.
    #[must_use]
    pub fn with_padding(mut self, padding: ScreenLength) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.children.direction()
    }

    /// Adds a cell sized by the sum of its providers along the layout direction.
    pub fn add_fixed_cell<I>(&mut self, providers: I) -> &mut LayoutCell
    where
        I: IntoIterator<Item = Rc<dyn ContentMeasure>>,
    {
        self.children.push_fixed(providers.into_iter().collect())
    }

    /// Adds a cell receiving `weight / total_weight` of the remaining space.
    pub fn add_relative_cell(&mut self, weight: f64, add_to_start: bool) -> &mut LayoutCell {
        self.children.push_relative(weight, add_to_start)
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.len() == 0
    }
}

impl LayoutNode for LinearLayout {
    fn key(&self) -> LayoutKey {
        self.key
    }

    fn calculate(
        &self,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()> {
        let area = match self.padding {
            Some(padding) => area.adjust_margins(padding.to_normalized(context)),
            None => area,
        };
        cache.set_area(self.key, area);
        self.children.arrange(self.key, context, cache, area, 0.0)
    }
}
