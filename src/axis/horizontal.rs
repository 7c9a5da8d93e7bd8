use std::cell::Cell;

use crate::axis::{AxisConfig, AxisCore, AxisStyle, HorizontalAxisPosition, pixel_edges};
use crate::core::{SharedScale, Size, format_tick_label};
use crate::error::ChartResult;
use crate::layout::{ContentMeasure, LayoutArea, LayoutContext};
use crate::render::{LinePrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign};

/// Gap between a tick mark and its label, in pixels.
const LABEL_GAP_PX: f64 = 2.0;

/// X axis drawn along the top or bottom edge of the plot.
///
/// Its measured height is the title height plus a fixed allowance for tick
/// marks and tick labels.
#[derive(Debug)]
pub struct HorizontalAxis {
    core: AxisCore,
    position: Cell<HorizontalAxisPosition>,
}

impl HorizontalAxis {
    #[must_use]
    pub fn new(scale: SharedScale, config: &AxisConfig) -> Self {
        Self {
            core: AxisCore::new(
                scale,
                config.x_axis_label.clone(),
                config.x_axis_extra_height_px,
                config,
            ),
            position: Cell::new(config.x_axis_position),
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

    /// Replaces the title; `None` or an empty string removes it.
    pub fn set_label(&self, label: Option<String>) {
        self.core.set_label(label);
    }

    #[must_use]
    pub fn position(&self) -> HorizontalAxisPosition {
        self.position.get()
    }

    pub fn set_position(&self, position: HorizontalAxisPosition) {
        self.position.set(position);
    }

    #[must_use]
    pub fn style(&self) -> AxisStyle {
        self.core.style()
    }

    pub fn set_style(&self, style: AxisStyle) {
        self.core.set_style(style);
    }

    /// Tick values that fit into `area` for the current scale range.
    pub fn ticks(&self, context: &LayoutContext, area: LayoutArea) -> ChartResult<Vec<f64>> {
        let available = context.viewport().to_pixels(area.width);
        Ok(self
            .core
            .placed_ticks(context, available, false)?
            .into_iter()
            .map(|(value, _)| value)
            .collect())
    }

    /// Emits border, tick marks, tick labels, title and vertical grid lines.
    ///
    /// `area` is the axis cell; grid lines span `plot_area` vertically.
    pub fn draw(
        &self,
        context: &LayoutContext,
        area: LayoutArea,
        plot_area: LayoutArea,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        let style = self.core.style();
        let (left, top, right, bottom) = pixel_edges(context, area);
        let (_, plot_top, _, plot_bottom) = pixel_edges(context, plot_area);
        let tick_length = self.core.tick_length_px();
        let tick_font = self.core.tick_font_px();

        // Edge facing the plot and the direction pointing away from it.
        let (edge_y, outward) = match self.position() {
            HorizontalAxisPosition::Bottom => (top, 1.0),
            HorizontalAxisPosition::Top => (bottom, -1.0),
        };
        frame
            .lines
            .push(LinePrimitive::new(left, edge_y, right, edge_y, 1.0, style.border));

        let available = context.viewport().to_pixels(area.width);
        for (value, relative) in self.core.placed_ticks(context, available, false)? {
            let x = left + relative * (right - left);
            frame.lines.push(LinePrimitive::new(
                x,
                edge_y,
                x,
                edge_y + outward * tick_length,
                1.0,
                style.tick,
            ));
            if let Some(grid) = style.grid {
                frame
                    .lines
                    .push(LinePrimitive::new(x, plot_top, x, plot_bottom, 1.0, grid));
            }

            let label_y = edge_y + outward * (tick_length + LABEL_GAP_PX);
            let v_align = match self.position() {
                HorizontalAxisPosition::Bottom => TextVAlign::Top,
                HorizontalAxisPosition::Top => TextVAlign::Bottom,
            };
            frame.texts.push(
                TextPrimitive::new(
                    format_tick_label(value),
                    x,
                    label_y,
                    tick_font,
                    style.text,
                    TextHAlign::Center,
                )
                .with_v_align(v_align),
            );
        }

        if let Some(title) = self.core.label() {
            let (title_y, v_align) = match self.position() {
                HorizontalAxisPosition::Bottom => (bottom, TextVAlign::Bottom),
                HorizontalAxisPosition::Top => (top, TextVAlign::Top),
            };
            frame.texts.push(
                TextPrimitive::new(
                    title,
                    (left + right) * 0.5,
                    title_y,
                    self.core.label_font_px(),
                    style.text,
                    TextHAlign::Center,
                )
                .with_v_align(v_align),
            );
        }

        Ok(())
    }
}

impl ContentMeasure for HorizontalAxis {
    fn measure(&self, context: &LayoutContext) -> Size {
        let label = self.core.label_size(context);
        Size::new(label.width, label.height + self.core.extra_px())
    }
}
