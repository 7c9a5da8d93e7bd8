use std::cell::Cell;

use crate::axis::{AxisConfig, AxisCore, AxisStyle, VerticalAxisPosition, pixel_edges};
use crate::core::{SharedScale, Size, format_tick_label};
use crate::error::ChartResult;
use crate::layout::{ContentMeasure, LayoutArea, LayoutContext};
use crate::render::{LinePrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign};

const LABEL_GAP_PX: f64 = 4.0;

/// Y axis drawn left or right of the plot, title rotated by 90 degrees.
#[derive(Debug)]
pub struct VerticalAxis {
    core: AxisCore,
    position: Cell<VerticalAxisPosition>,
}

impl VerticalAxis {
    #[must_use]
    pub fn new(
        scale: SharedScale,
        label: Option<String>,
        position: VerticalAxisPosition,
        config: &AxisConfig,
    ) -> Self {
        let core = AxisCore::new(scale, None, config.y_axis_extra_width_px, config);
        core.set_label(label);
        Self {
            core,
            position: Cell::new(position),
        }
    }

    #[must_use]
    pub fn scale(&self) -> &SharedScale {
        self.core.scale()
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.core.label()
    }

    pub fn set_label(&self, label: Option<String>) {
        self.core.set_label(label);
    }

    #[must_use]
    pub fn position(&self) -> VerticalAxisPosition {
        self.position.get()
    }

    pub fn set_position(&self, position: VerticalAxisPosition) {
        self.position.set(position);
    }

    #[must_use]
    pub fn style(&self) -> AxisStyle {
        self.core.style()
    }

    pub fn set_style(&self, style: AxisStyle) {
        self.core.set_style(style);
    }

    /// Tick values for `area`; labels stack along the text height, so only
    /// the height of a digit is reserved per tick.
    pub fn ticks(&self, context: &LayoutContext, area: LayoutArea) -> ChartResult<Vec<f64>> {
        let available = context.viewport().to_pixels(area.height);
        Ok(self
            .core
            .placed_ticks(context, available, true)?
            .into_iter()
            .map(|(value, _)| value)
            .collect())
    }

    /// Emits border, tick marks, tick labels, rotated title and horizontal
    /// grid lines spanning `plot_area`.
    pub fn draw(
        &self,
        context: &LayoutContext,
        area: LayoutArea,
        plot_area: LayoutArea,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        let style = self.core.style();
        let (left, top, right, bottom) = pixel_edges(context, area);
        let (plot_left, _, plot_right, _) = pixel_edges(context, plot_area);
        let tick_length = self.core.tick_length_px();

        let (edge_x, outward, label_align) = match self.position() {
            VerticalAxisPosition::Left => (right, -1.0, TextHAlign::Right),
            VerticalAxisPosition::Right => (left, 1.0, TextHAlign::Left),
        };
        frame
            .lines
            .push(LinePrimitive::new(edge_x, top, edge_x, bottom, 1.0, style.border));

        let available = context.viewport().to_pixels(area.height);
        for (value, relative) in self.core.placed_ticks(context, available, true)? {
            let y = bottom - relative * (bottom - top);
            frame.lines.push(LinePrimitive::new(
                edge_x,
                y,
                edge_x + outward * tick_length,
                y,
                1.0,
                style.tick,
            ));
            if let Some(grid) = style.grid {
                frame
                    .lines
                    .push(LinePrimitive::new(plot_left, y, plot_right, y, 1.0, grid));
            }
            frame.texts.push(TextPrimitive::new(
                format_tick_label(value),
                edge_x + outward * (tick_length + LABEL_GAP_PX),
                y,
                self.core.tick_font_px(),
                style.text,
                label_align,
            ));
        }

        if let Some(title) = self.core.label() {
            let (title_x, v_align) = match self.position() {
                VerticalAxisPosition::Left => (left, TextVAlign::Top),
                VerticalAxisPosition::Right => (right, TextVAlign::Bottom),
            };
            frame.texts.push(
                TextPrimitive::new(
                    title,
                    title_x,
                    (top + bottom) * 0.5,
                    self.core.label_font_px(),
                    style.text,
                    TextHAlign::Center,
                )
                .with_v_align(v_align)
                .rotated(90.0),
            );
        }

        Ok(())
    }
}

impl ContentMeasure for VerticalAxis {
    fn measure(&self, context: &LayoutContext) -> Size {
        let label = self.core.label_size(context).rotated();
        Size::new(label.width + self.core.extra_px(), label.height)
    }
}
