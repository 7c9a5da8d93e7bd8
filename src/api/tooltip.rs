//! Hover overlays drawn from the dispatcher's pointer position.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::LineSeries;
use crate::core::{SharedScale, Vector2, format_tick_label};
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutArea;
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

const DEFAULT_POINT_SIZE_PX: f64 = 8.0;
const LABEL_GAP_PX: f64 = 3.0;

/// Crosshair through the hover position, limited to one area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipLine {
    color: Color,
    vertical: bool,
    horizontal: bool,
    stroke_width: f64,
}

impl Default for TooltipLine {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            vertical: true,
            horizontal: false,
            stroke_width: 1.0,
        }
    }
}

impl TooltipLine {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn show_lines(mut self, vertical: bool, horizontal: bool) -> Self {
        self.vertical = vertical;
        self.horizontal = horizontal;
        self
    }

    /// Pushes the enabled lines when `position` lies inside `area`; returns
    /// whether anything was drawn.
    pub fn draw(&self, position: Option<Vector2>, area: LayoutArea, frame: &mut RenderFrame) -> bool {
        let Some(position) = position.filter(|position| area.contains(*position)) else {
            return false;
        };

        if self.vertical {
            frame.push_normalized_line(
                (position.x, area.top),
                (position.x, area.bottom()),
                self.stroke_width,
                self.color,
            );
        }
        if self.horizontal {
            frame.push_normalized_line(
                (area.left, position.y),
                (area.right(), position.y),
                self.stroke_width,
                self.color,
            );
        }
        self.vertical || self.horizontal
    }
}

#[derive(Debug, Clone)]
struct MarkedSeries {
    series: Rc<RefCell<LineSeries>>,
    x_scale: SharedScale,
    y_scale: SharedScale,
    point_size_px: f64,
}

/// Highlights, per registered series, the point nearest to the hover x with
/// a square marker and its y value.
#[derive(Debug, Clone)]
pub struct TooltipMarkers {
    line_color: Color,
    show_line: bool,
    label_font_px: f64,
    series: Vec<MarkedSeries>,
}

impl Default for TooltipMarkers {
    fn default() -> Self {
        Self {
            line_color: Color::BLACK,
            show_line: true,
            label_font_px: 12.0,
            series: Vec::new(),
        }
    }
}

impl TooltipMarkers {
    #[must_use]
    pub fn with_line(mut self, show_line: bool, color: Color) -> Self {
        self.show_line = show_line;
        self.line_color = color;
        self
    }

    pub fn with_label_font_px(mut self, label_font_px: f64) -> ChartResult<Self> {
        if !label_font_px.is_finite() || label_font_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "marker label font size must be finite and > 0".to_owned(),
            ));
        }
        self.label_font_px = label_font_px;
        Ok(self)
    }

    /// Registers a series; `point_size_px` defaults to 8 pixels. Points are
    /// expected sorted by x.
    pub fn add_series(
        &mut self,
        series: Rc<RefCell<LineSeries>>,
        x_scale: SharedScale,
        y_scale: SharedScale,
        point_size_px: Option<f64>,
    ) -> ChartResult<()> {
        let point_size_px = point_size_px.unwrap_or(DEFAULT_POINT_SIZE_PX);
        if !point_size_px.is_finite() || point_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "marker point size must be finite and > 0".to_owned(),
            ));
        }
        self.series.push(MarkedSeries {
            series,
            x_scale,
            y_scale,
            point_size_px,
        });
        Ok(())
    }

    pub fn clear_series(&mut self) {
        self.series.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Draws markers for the hover position inside `area` and returns how
    /// many series got one. Series with no point under the hover x, or whose
    /// nearest point falls outside the area, are skipped.
    pub fn draw(
        &self,
        position: Option<Vector2>,
        area: LayoutArea,
        frame: &mut RenderFrame,
    ) -> ChartResult<usize> {
        let Some(position) = position.filter(|position| area.contains(*position)) else {
            return Ok(0);
        };
        if area.width <= 0.0 || area.height <= 0.0 {
            return Ok(0);
        }

        let mut marked = 0;
        for entry in &self.series {
            let x_scale = entry.x_scale.borrow();
            let y_scale = entry.y_scale.borrow();
            if x_scale.range() == 0.0 || y_scale.range() == 0.0 {
                continue;
            }

            let hover_x = x_scale.value_at(area.left, position.x, area.right())?;
            let series = entry.series.borrow();
            let Some(point) = series
                .nearest_index(hover_x)
                .and_then(|index| series.points().get(index))
            else {
                continue;
            };

            let x = area.left + (point.x - x_scale.min()) / x_scale.range() * area.width;
            let y = area.bottom() - (point.y - y_scale.min()) / y_scale.range() * area.height;
            if !area.contains(Vector2::new(x, y)) {
                continue;
            }

            if self.show_line {
                frame.push_normalized_line((x, area.top), (x, area.bottom()), 1.0, self.line_color);
            }

            let size = entry.point_size_px;
            let center_x = frame.viewport.to_pixels(x);
            let center_y = frame.viewport.to_pixels(y);
            frame.rects.push(RectPrimitive::filled(
                center_x - size * 0.5,
                center_y - size * 0.5,
                size,
                size,
                series.color(),
            ));
            frame.texts.push(TextPrimitive::new(
                format_tick_label(point.y),
                center_x - (size + LABEL_GAP_PX),
                center_y,
                self.label_font_px,
                series.color(),
                TextHAlign::Right,
            ));
            marked += 1;
        }

        Ok(marked)
    }
}
