use std::cell::RefMut;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::axis::{
    AxisConfig, HorizontalAxis, HorizontalAxisPosition, VerticalAxis, VerticalAxisPosition,
};
use crate::core::{Scale, SharedScale};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    EventDispatcher, EventPayload, EventType, EventValue, InteractionConfig, SharedEventHandler,
};
use crate::layout::{
    ContentMeasure, HorizontalTableLayout, IntersectedLayout, LayoutArea, LayoutCache, LayoutCell,
    LayoutContext, LayoutKey, LayoutNode, LinearLayout, TableRowLayout,
};
use crate::render::RenderFrame;

/// Cache keys of the regions of the current tree; they change on rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRegions {
    /// Plot column of the table row, spanning the x-axis row as well.
    pub plot_column: LayoutKey,
    pub plot_row: LayoutKey,
    pub x_axis_row: LayoutKey,
    pub x_axis_cell: LayoutKey,
    /// Where series are drawn: plot column ∩ plot row.
    pub chart_cell: LayoutKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanAxis {
    Horizontal,
    Vertical,
}

/// Wheel and pan listeners bound to one scale.
struct ScaleHandlers {
    zoom: SharedEventHandler,
    pan: SharedEventHandler,
}

impl ScaleHandlers {
    fn new(scale: &SharedScale, interaction: InteractionConfig, pan_axis: PanAxis) -> Self {
        Self {
            zoom: zoom_handler(scale.clone(), interaction),
            pan: pan_handler(scale.clone(), pan_axis),
        }
    }

    fn register(&self, dispatcher: &mut EventDispatcher, node: LayoutKey) {
        dispatcher.on(EventType::Wheel, node, self.zoom.clone());
        dispatcher.on(EventType::Pan, node, self.pan.clone());
    }

    fn unregister(&self, dispatcher: &mut EventDispatcher) {
        dispatcher.off(&self.zoom);
        dispatcher.off(&self.pan);
    }
}

/// One y axis of a [`BasicChartLayout`] and the tree nodes it occupies.
pub struct YAxisLayout {
    axis: Rc<VerticalAxis>,
    handlers: ScaleHandlers,
    column: LayoutKey,
    cell: LayoutKey,
}

impl YAxisLayout {
    #[must_use]
    pub fn axis(&self) -> &Rc<VerticalAxis> {
        &self.axis
    }

    #[must_use]
    pub fn scale(&self) -> &SharedScale {
        self.axis.scale()
    }

    /// Table-row column holding the axis.
    #[must_use]
    pub fn column(&self) -> LayoutKey {
        self.column
    }

    /// Column ∩ plot row: where the axis is drawn and receives gestures.
    #[must_use]
    pub fn cell(&self) -> LayoutKey {
        self.cell
    }
}

impl fmt::Debug for YAxisLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YAxisLayout")
            .field("axis", &self.axis)
            .field("column", &self.column)
            .field("cell", &self.cell)
            .finish()
    }
}

/// Plot region framed by one x axis and any number of y axes.
///
/// ```text
/// tree
/// ├── table row  [left y axes] [plot column: 1] [right y axes]
/// ├── vertical   [top x axis]? [plot row: 1] [bottom x axis]?
/// ├── x-axis cell   = plot column ∩ x-axis row
/// ├── y-axis cells  = y column ∩ plot row
/// └── chart cell    = plot column ∩ plot row
/// ```
///
/// Wheel over the plot column zooms the x scale, drag pans it horizontally;
/// the same gestures over a y-axis cell act on that axis' scale. The tree
/// and listener bindings are rebuilt whenever axes are added or moved.
pub struct BasicChartLayout {
    tree: LayoutCell,
    axes: AxisConfig,
    interaction: InteractionConfig,
    table: Option<HorizontalTableLayout>,
    x_axis: Rc<HorizontalAxis>,
    x_handlers: ScaleHandlers,
    y_axes: Vec<YAxisLayout>,
    regions: ChartRegions,
}

impl fmt::Debug for BasicChartLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicChartLayout")
            .field("tree", &self.tree)
            .field("x_axis", &self.x_axis)
            .field("y_axes", &self.y_axes)
            .field("regions", &self.regions)
            .finish()
    }
}

impl BasicChartLayout {
    /// Builds the tree for `x_scale` without y axes and binds the x listeners.
    ///
    /// With a `table`, the y-axis columns of this chart line up with every
    /// other chart sharing the table. Zoom speed follows the dispatcher's
    /// interaction config.
    pub fn new(
        dispatcher: &mut EventDispatcher,
        x_scale: SharedScale,
        table: Option<&HorizontalTableLayout>,
        axes: AxisConfig,
    ) -> ChartResult<Self> {
        axes.validate()?;
        let interaction = dispatcher.config();
        let x_handlers = ScaleHandlers::new(&x_scale, interaction, PanAxis::Horizontal);
        let x_axis = Rc::new(HorizontalAxis::new(x_scale, &axes));

        let mut chart = Self {
            tree: LayoutCell::new(),
            axes,
            interaction,
            table: table.cloned(),
            x_axis,
            x_handlers,
            y_axes: Vec::new(),
            regions: placeholder_regions(),
        };
        chart.rebuild(dispatcher);
        Ok(chart)
    }

    /// Adds a y axis for `scale` and returns its index.
    pub fn add_y_scale(
        &mut self,
        dispatcher: &mut EventDispatcher,
        scale: SharedScale,
        label: Option<String>,
        position: VerticalAxisPosition,
    ) -> usize {
        let handlers = ScaleHandlers::new(&scale, self.interaction, PanAxis::Vertical);
        let axis = Rc::new(VerticalAxis::new(scale, label, position, &self.axes));
        self.y_axes.push(YAxisLayout {
            axis,
            handlers,
            column: self.regions.plot_column,
            cell: self.regions.chart_cell,
        });
        self.rebuild(dispatcher);
        self.y_axes.len() - 1
    }

    pub fn set_x_axis_position(
        &mut self,
        dispatcher: &mut EventDispatcher,
        position: HorizontalAxisPosition,
    ) {
        if self.x_axis.position() == position {
            return;
        }
        self.x_axis.set_position(position);
        self.rebuild(dispatcher);
    }

    pub fn set_y_axis_position(
        &mut self,
        dispatcher: &mut EventDispatcher,
        index: usize,
        position: VerticalAxisPosition,
    ) -> ChartResult<()> {
        let axis = self
            .y_axes
            .get(index)
            .map(|y_axis| y_axis.axis.clone())
            .ok_or_else(|| ChartError::InvalidData(format!("no y axis at index {index}")))?;
        if axis.position() != position {
            axis.set_position(position);
            self.rebuild(dispatcher);
        }
        Ok(())
    }

    /// Removes every listener of this chart from `dispatcher`.
    pub fn detach(&self, dispatcher: &mut EventDispatcher) {
        self.x_handlers.unregister(dispatcher);
        for y_axis in &self.y_axes {
            y_axis.handlers.unregister(dispatcher);
        }
    }

    #[must_use]
    pub fn x_axis(&self) -> &Rc<HorizontalAxis> {
        &self.x_axis
    }

    #[must_use]
    pub fn x_scale(&self) -> &SharedScale {
        self.x_axis.scale()
    }

    #[must_use]
    pub fn y_axis(&self, index: usize) -> Option<&YAxisLayout> {
        self.y_axes.get(index)
    }

    #[must_use]
    pub fn y_axis_count(&self) -> usize {
        self.y_axes.len()
    }

    #[must_use]
    pub fn regions(&self) -> ChartRegions {
        self.regions
    }

    /// Area where series are drawn for the current frame.
    pub fn chart_area(&self, cache: &LayoutCache) -> ChartResult<LayoutArea> {
        cache.area(self.regions.chart_cell)
    }

    /// Emits the primitives of every axis, with grid lines across the chart
    /// cell. Call after the layout pass of the frame.
    pub fn draw(
        &self,
        context: &LayoutContext,
        cache: &LayoutCache,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        let chart_area = self.chart_area(cache)?;
        let x_area = cache.area(self.regions.x_axis_cell)?;
        self.x_axis.draw(context, x_area, chart_area, frame)?;
        for y_axis in &self.y_axes {
            let area = cache.area(y_axis.cell)?;
            y_axis.axis.draw(context, area, chart_area, frame)?;
        }
        Ok(())
    }

    fn rebuild(&mut self, dispatcher: &mut EventDispatcher) {
        // Dropping the old row unregisters it from the shared table.
        self.tree.clear();

        let mut row = match &self.table {
            Some(table) => table.add_row(None),
            None => TableRowLayout::standalone(None),
        };
        let mut y_columns = Vec::with_capacity(self.y_axes.len());
        for (index, y_axis) in self.y_axes.iter().enumerate() {
            if y_axis.axis.position() == VerticalAxisPosition::Left {
                y_columns.push((index, add_axis_column(&mut row, y_axis)));
            }
        }
        let plot_column = row.add_relative_cell(1.0, false).key();
        for (index, y_axis) in self.y_axes.iter().enumerate() {
            if y_axis.axis.position() == VerticalAxisPosition::Right {
                y_columns.push((index, add_axis_column(&mut row, y_axis)));
            }
        }

        let mut vertical = LinearLayout::vertical();
        let x_provider: Rc<dyn ContentMeasure> = self.x_axis.clone();
        let (x_axis_row, plot_row) = match self.x_axis.position() {
            HorizontalAxisPosition::Top => {
                let x_axis_row = vertical.add_fixed_cell([x_provider]).key();
                let plot_row = vertical.add_relative_cell(1.0, false).key();
                (x_axis_row, plot_row)
            }
            HorizontalAxisPosition::Bottom => {
                let plot_row = vertical.add_relative_cell(1.0, false).key();
                let x_axis_row = vertical.add_fixed_cell([x_provider]).key();
                (x_axis_row, plot_row)
            }
        };

        self.tree.add_layout(row);
        self.tree.add_layout(vertical);
        let x_axis_cell = self
            .tree
            .add_layout(IntersectedLayout::of(plot_column, x_axis_row));
        for (index, column) in y_columns {
            let cell = self.tree.add_layout(IntersectedLayout::of(column, plot_row));
            let y_axis = &mut self.y_axes[index];
            y_axis.column = column;
            y_axis.cell = cell;
        }
        let chart_cell = self
            .tree
            .add_layout(IntersectedLayout::of(plot_column, plot_row));

        self.regions = ChartRegions {
            plot_column,
            plot_row,
            x_axis_row,
            x_axis_cell,
            chart_cell,
        };

        self.x_handlers.register(dispatcher, plot_column);
        for y_axis in &self.y_axes {
            y_axis.handlers.register(dispatcher, y_axis.cell);
        }

        debug!(
            y_axes = self.y_axes.len(),
            nodes = self.tree.len(),
            shared_table = self.table.is_some(),
            "rebuilt chart layout"
        );
    }
}

impl LayoutNode for BasicChartLayout {
    fn key(&self) -> LayoutKey {
        self.tree.key()
    }

    fn calculate(
        &self,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()> {
        self.tree.calculate(context, cache, area)
    }
}

fn add_axis_column(row: &mut TableRowLayout, y_axis: &YAxisLayout) -> LayoutKey {
    let provider: Rc<dyn ContentMeasure> = y_axis.axis.clone();
    row.add_fixed_cell([provider]).key()
}

fn placeholder_regions() -> ChartRegions {
    let key = LayoutKey::next();
    ChartRegions {
        plot_column: key,
        plot_row: key,
        x_axis_row: key,
        x_axis_cell: key,
        chart_cell: key,
    }
}

fn zoom_handler(scale: SharedScale, interaction: InteractionConfig) -> SharedEventHandler {
    Rc::new(
        move |event: &EventValue, _node: LayoutKey, _area: LayoutArea| -> ChartResult<bool> {
            let EventPayload::Wheel { delta } = event.payload else {
                return Ok(false);
            };
            let fraction = interaction.wheel_zoom_fraction(delta);
            borrow_scale_mut(&scale)?.zoom(fraction)?;
            Ok(true)
        },
    )
}

/// Pans by the gesture delta relative to the listener area, so dragging
/// across the whole area shifts the scale by its full range.
fn pan_handler(scale: SharedScale, pan_axis: PanAxis) -> SharedEventHandler {
    Rc::new(
        move |event: &EventValue, _node: LayoutKey, area: LayoutArea| -> ChartResult<bool> {
            let EventPayload::Pan { delta } = event.payload else {
                return Ok(false);
            };
            let fraction = match pan_axis {
                PanAxis::Horizontal if area.width > 0.0 => delta.x / area.width,
                // Screen y grows downwards, values grow upwards.
                PanAxis::Vertical if area.height > 0.0 => -delta.y / area.height,
                _ => return Ok(false),
            };
            borrow_scale_mut(&scale)?.pan(fraction)?;
            Ok(true)
        },
    )
}

fn borrow_scale_mut(scale: &SharedScale) -> ChartResult<RefMut<'_, Scale>> {
    scale.try_borrow_mut().map_err(|_| {
        ChartError::InvalidData("scale is borrowed while handling a gesture".to_owned())
    })
}
