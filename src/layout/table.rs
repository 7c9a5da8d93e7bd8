use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ChartResult;
use crate::layout::linear::{LinearChildren, measure_providers};
use crate::layout::{
    ContentMeasure, Direction, LayoutArea, LayoutCache, LayoutCell, LayoutContext, LayoutKey,
    LayoutNode, ScreenLength,
};

#[derive(Debug)]
struct TableColumns {
    key: LayoutKey,
    /// Fixed-cell providers of every live row, keyed by row.
    rows: RefCell<IndexMap<LayoutKey, Vec<Rc<dyn ContentMeasure>>>>,
}

/// Groups independent rows so their fixed (axis) regions share one width.
///
/// The table is not part of the layout tree itself; its rows are. Each row
/// asks the table for the widest fixed region among all rows and pads its own
/// to match, so the relative (chart) cells start at the same offset.
#[derive(Debug, Clone)]
pub struct HorizontalTableLayout {
    columns: Rc<TableColumns>,
}

impl Default for HorizontalTableLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizontalTableLayout {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Rc::new(TableColumns {
                key: LayoutKey::next(),
                rows: RefCell::new(IndexMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn key(&self) -> LayoutKey {
        self.columns.key
    }

    /// Creates a row that aligns with the other rows of this table.
    #[must_use]
    pub fn add_row(&self, padding: Option<ScreenLength>) -> TableRowLayout {
        let row = TableRowLayout::build(Some(self.clone()), padding);
        self.columns.rows.borrow_mut().insert(row.key, Vec::new());
        row
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.rows.borrow().len()
    }

    /// Widest total fixed width over all rows, measured once per frame.
    pub fn max_total_fixed_width(&self, context: &LayoutContext, cache: &mut LayoutCache) -> f64 {
        if let Some(width) = cache.extent(self.columns.key) {
            return width;
        }

        let width = self
            .columns
            .rows
            .borrow()
            .values()
            .map(|providers| measure_providers(providers, Direction::Horizontal, context))
            .fold(0.0, f64::max);

        cache.set_extent(self.columns.key, width);
        trace!(key = %self.columns.key, width, "measured table fixed width");
        width
    }

    fn register(&self, row: LayoutKey, providers: &[Rc<dyn ContentMeasure>]) {
        if let Some(entry) = self.columns.rows.borrow_mut().get_mut(&row) {
            entry.extend(providers.iter().cloned());
        }
    }

    fn reset_row(&self, row: LayoutKey) {
        if let Some(entry) = self.columns.rows.borrow_mut().get_mut(&row) {
            entry.clear();
        }
    }

    fn remove_row(&self, row: LayoutKey) {
        self.columns.rows.borrow_mut().shift_remove(&row);
    }
}

/// Horizontal row whose fixed region is padded to its table's widest row.
///
/// Without a table it behaves like a horizontal [`LinearLayout`](crate::layout::LinearLayout).
#[derive(Debug)]
pub struct TableRowLayout {
    key: LayoutKey,
    padding: Option<ScreenLength>,
    table: Option<HorizontalTableLayout>,
    children: LinearChildren,
}

impl TableRowLayout {
    /// A row that does not belong to any table.
    #[must_use]
    pub fn standalone(padding: Option<ScreenLength>) -> Self {
        Self::build(None, padding)
    }

    fn build(table: Option<HorizontalTableLayout>, padding: Option<ScreenLength>) -> Self {
        Self {
            key: LayoutKey::next(),
            padding,
            table,
            children: LinearChildren::new(Direction::Horizontal),
        }
    }

    #[must_use]
    pub fn table(&self) -> Option<&HorizontalTableLayout> {
        self.table.as_ref()
    }

    pub fn add_fixed_cell<I>(&mut self, providers: I) -> &mut LayoutCell
    where
        I: IntoIterator<Item = Rc<dyn ContentMeasure>>,
    {
        let providers: Vec<Rc<dyn ContentMeasure>> = providers.into_iter().collect();
        if let Some(table) = &self.table {
            table.register(self.key, &providers);
        }
        self.children.push_fixed(providers)
    }

    pub fn add_relative_cell(&mut self, weight: f64, add_to_start: bool) -> &mut LayoutCell {
        self.children.push_relative(weight, add_to_start)
    }

    /// Removes all cells; the row stays registered with its table.
    pub fn clear(&mut self) {
        self.children.clear();
        if let Some(table) = &self.table {
            table.reset_row(self.key);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.len() == 0
    }

    /// This row's own fixed width, in normalized units.
    #[must_use]
    pub fn total_fixed_width(&self, context: &LayoutContext) -> f64 {
        self.children.fixed_extent(context)
    }
}

impl Drop for TableRowLayout {
    fn drop(&mut self) {
        if let Some(table) = &self.table {
            table.remove_row(self.key);
        }
    }
}

impl LayoutNode for TableRowLayout {
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

        let reserved = match &self.table {
            Some(table) => table.max_total_fixed_width(context, cache),
            None => 0.0,
        };
        self.children.arrange(self.key, context, cache, area, reserved)
    }
}
