use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Scale, project_line_segments};
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutArea;
use crate::render::{Color, LinePrimitive, RenderFrame};

/// Polyline drawn through data points, mapped by an x and a y scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    points: Vec<DataPoint>,
    color: Color,
    stroke_width: f64,
}

impl LineSeries {
    #[must_use]
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self {
            points,
            color: Color::by_index(0),
            stroke_width: 1.5,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> ChartResult<Self> {
        if !stroke_width.is_finite() || stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "series stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.stroke_width = stroke_width;
        Ok(self)
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Index of the point whose x is closest to `x`, assuming points sorted
    /// by x. `None` when the series is empty or `x` lies outside its x span.
    #[must_use]
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if !(first.x..=last.x).contains(&x) {
            return None;
        }

        let upper = self.points.partition_point(|point| point.x < x);
        if upper == 0 {
            return Some(0);
        }
        let lower = upper - 1;
        match self.points.get(upper) {
            Some(next) if next.x - x < x - self.points[lower].x => Some(upper),
            _ => Some(lower),
        }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    /// Adds the series segments inside `area` (usually the chart cell).
    pub fn draw(
        &self,
        x_scale: &Scale,
        y_scale: &Scale,
        area: LayoutArea,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        let segments = project_line_segments(&self.points, x_scale, y_scale, area, frame.viewport)?;
        frame.lines.extend(segments.into_iter().map(|segment| {
            LinePrimitive::new(
                segment.x1,
                segment.y1,
                segment.x2,
                segment.y2,
                self.stroke_width,
                self.color,
            )
        }));
        Ok(())
    }
}
