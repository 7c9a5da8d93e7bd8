//! Numeric axes: content providers for the layout and primitive emitters for
//! the renderer.

mod horizontal;
mod vertical;

pub use horizontal::HorizontalAxis;
pub use vertical::VerticalAxis;

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::core::{Scale, SharedScale, Size};
use crate::error::{ChartError, ChartResult};
use crate::layout::{LayoutArea, LayoutContext};
use crate::render::Color;

/// Ranges below this are drawn with their single tick centered.
const FLAT_RANGE_ABS: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HorizontalAxisPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalAxisPosition {
    #[default]
    Left,
    Right,
}

/// Colors of one axis. `grid: None` disables grid lines across the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    #[serde(default = "default_border_color")]
    pub border: Color,
    #[serde(default = "default_tick_color")]
    pub tick: Color,
    #[serde(default = "default_text_color")]
    pub text: Color,
    #[serde(default = "default_grid_color")]
    pub grid: Option<Color>,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            border: default_border_color(),
            tick: default_tick_color(),
            text: default_text_color(),
            grid: default_grid_color(),
        }
    }
}

/// Axis sizing and typography shared by all axes of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Pixels added to the x-axis label height (tick marks and tick labels).
    #[serde(default = "default_x_axis_extra_height_px")]
    pub x_axis_extra_height_px: f64,
    /// Pixels added to the rotated y-axis label width.
    #[serde(default = "default_y_axis_extra_width_px")]
    pub y_axis_extra_width_px: f64,
    #[serde(default = "default_label_font_px")]
    pub label_font_px: f64,
    #[serde(default = "default_tick_font_px")]
    pub tick_font_px: f64,
    #[serde(default = "default_tick_length_px")]
    pub tick_length_px: f64,
    #[serde(default = "default_x_axis_label")]
    pub x_axis_label: Option<String>,
    #[serde(default)]
    pub x_axis_position: HorizontalAxisPosition,
    #[serde(default)]
    pub style: AxisStyle,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            x_axis_extra_height_px: default_x_axis_extra_height_px(),
            y_axis_extra_width_px: default_y_axis_extra_width_px(),
            label_font_px: default_label_font_px(),
            tick_font_px: default_tick_font_px(),
            tick_length_px: default_tick_length_px(),
            x_axis_label: default_x_axis_label(),
            x_axis_position: HorizontalAxisPosition::default(),
            style: AxisStyle::default(),
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_x_axis_label(mut self, label: Option<String>) -> Self {
        self.x_axis_label = label;
        self
    }

    #[must_use]
    pub fn with_x_axis_position(mut self, position: HorizontalAxisPosition) -> Self {
        self.x_axis_position = position;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("x_axis_extra_height_px", self.x_axis_extra_height_px),
            ("y_axis_extra_width_px", self.y_axis_extra_width_px),
            ("tick_length_px", self.tick_length_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("label_font_px", self.label_font_px),
            ("tick_font_px", self.tick_font_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        self.style.border.validate()?;
        self.style.tick.validate()?;
        self.style.text.validate()?;
        if let Some(grid) = self.style.grid {
            grid.validate()?;
        }
        Ok(())
    }
}

/// State shared by both axis orientations.
#[derive(Debug)]
pub(crate) struct AxisCore {
    scale: SharedScale,
    label: RefCell<Option<String>>,
    style: Cell<AxisStyle>,
    extra_px: f64,
    label_font_px: f64,
    tick_font_px: f64,
    tick_length_px: f64,
}

impl AxisCore {
    pub(crate) fn new(scale: SharedScale, label: Option<String>, extra_px: f64, config: &AxisConfig) -> Self {
        Self {
            scale,
            label: RefCell::new(label),
            style: Cell::new(config.style),
            extra_px,
            label_font_px: config.label_font_px,
            tick_font_px: config.tick_font_px,
            tick_length_px: config.tick_length_px,
        }
    }

    pub(crate) fn scale(&self) -> &SharedScale {
        &self.scale
    }

    pub(crate) fn label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    pub(crate) fn set_label(&self, label: Option<String>) {
        *self.label.borrow_mut() = label.filter(|text| !text.is_empty());
    }

    pub(crate) fn style(&self) -> AxisStyle {
        self.style.get()
    }

    pub(crate) fn set_style(&self, style: AxisStyle) {
        self.style.set(style);
    }

    pub(crate) fn extra_px(&self) -> f64 {
        self.extra_px
    }

    pub(crate) fn label_font_px(&self) -> f64 {
        self.label_font_px
    }

    pub(crate) fn tick_font_px(&self) -> f64 {
        self.tick_font_px
    }

    pub(crate) fn tick_length_px(&self) -> f64 {
        self.tick_length_px
    }

    /// Unrotated pixel size of the axis title; zero without a title.
    pub(crate) fn label_size(&self, context: &LayoutContext) -> Size {
        match self.label.borrow().as_deref() {
            Some(text) => context.text_measurer().measure(text, self.label_font_px),
            None => Size::ZERO,
        }
    }

    /// Width of one tick digit, the unit of the tick footprint estimate.
    pub(crate) fn letter_px(&self, context: &LayoutContext) -> f64 {
        context.text_measurer().measure("0", self.tick_font_px).width
    }

    /// Ticks of the current scale paired with their relative position in
    /// `[0, 1]` along the axis. Empty when there is no room for labels.
    pub(crate) fn placed_ticks(
        &self,
        context: &LayoutContext,
        available_px: f64,
        ignore_label_width: bool,
    ) -> ChartResult<Vec<(f64, f64)>> {
        let letter_px = self.letter_px(context);
        if available_px <= 0.0 || letter_px <= 0.0 {
            return Ok(Vec::new());
        }
        let scale: Scale = *self.scale.borrow();
        let ticks = scale.calculate_ticks(letter_px, available_px, ignore_label_width)?;
        Ok(ticks
            .into_iter()
            .map(|value| (value, relative_on(&scale, value)))
            .filter(|(_, relative)| (0.0..=1.0).contains(relative))
            .collect())
    }
}

fn relative_on(scale: &Scale, value: f64) -> f64 {
    let range = scale.range();
    if range.abs() < FLAT_RANGE_ABS {
        return 0.5;
    }
    (value - scale.min()) / range
}

/// Pixel rectangle of a normalized area, as `(left, top, right, bottom)`.
pub(crate) fn pixel_edges(context: &LayoutContext, area: LayoutArea) -> (f64, f64, f64, f64) {
    let viewport = context.viewport();
    (
        viewport.to_pixels(area.left),
        viewport.to_pixels(area.top),
        viewport.to_pixels(area.right()),
        viewport.to_pixels(area.bottom()),
    )
}

fn default_border_color() -> Color {
    Color::BLACK
}

fn default_tick_color() -> Color {
    Color::DARK_GRAY
}

fn default_text_color() -> Color {
    Color::BLACK
}

fn default_grid_color() -> Option<Color> {
    Some(Color::LIGHT_GRAY)
}

fn default_x_axis_extra_height_px() -> f64 {
    40.0
}

fn default_y_axis_extra_width_px() -> f64 {
    70.0
}

fn default_label_font_px() -> f64 {
    14.0
}

fn default_tick_font_px() -> f64 {
    12.0
}

fn default_tick_length_px() -> f64 {
    6.0
}

fn default_x_axis_label() -> Option<String> {
    Some("X Axis".to_owned())
}
