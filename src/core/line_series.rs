use crate::core::{DataPoint, Scale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutArea;
use serde::{Deserialize, Serialize};

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Projects series points into adjacent line segments inside `area`.
///
/// `x_scale` spans the area left to right and `y_scale` bottom to top.
/// Points are not clipped; callers draw into a clipped target if needed.
pub fn project_line_segments(
    points: &[DataPoint],
    x_scale: &Scale,
    y_scale: &Scale,
    area: LayoutArea,
    viewport: Viewport,
) -> ChartResult<Vec<LineSegment>> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let mut mapped = Vec::with_capacity(points.len());
    for point in points {
        let x = area.left + relative_position(x_scale, point.x, "x")? * area.width;
        let y = area.bottom() - relative_position(y_scale, point.y, "y")? * area.height;
        mapped.push((viewport.to_pixels(x), viewport.to_pixels(y)));
    }

    let mut segments = Vec::with_capacity(mapped.len() - 1);
    for pair in mapped.windows(2) {
        segments.push(LineSegment {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
        });
    }

    Ok(segments)
}

fn relative_position(scale: &Scale, value: f64, axis: &str) -> ChartResult<f64> {
    let range = scale.range();
    if range == 0.0 || !value.is_finite() {
        return Err(degenerate_scale(axis));
    }
    Ok((value - scale.min()) / range)
}

fn degenerate_scale(axis: &str) -> ChartError {
    ChartError::InvalidData(format!(
        "{axis} projection requires a finite value and a non-zero scale range"
    ))
}
