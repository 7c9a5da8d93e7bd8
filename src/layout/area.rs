use serde::{Deserialize, Serialize};

use crate::core::Vector2;
use crate::layout::Alignment;

/// Axis-aligned rectangle in normalized screen units.
///
/// One unit equals the viewport's pixel width on both axes, so heights are
/// width-relative and squares stay square regardless of the aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutArea {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds an area from two corners, flooring negative extents to zero.
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, (x2 - x1).max(0.0), (y2 - y1).max(0.0))
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Top left corner.
    #[must_use]
    pub fn p0(&self) -> Vector2 {
        Vector2::new(self.left, self.top)
    }

    /// Top right corner.
    #[must_use]
    pub fn p1(&self) -> Vector2 {
        Vector2::new(self.right(), self.top)
    }

    /// Bottom right corner.
    #[must_use]
    pub fn p2(&self) -> Vector2 {
        Vector2::new(self.right(), self.bottom())
    }

    /// Bottom left corner.
    #[must_use]
    pub fn p3(&self) -> Vector2 {
        Vector2::new(self.left, self.bottom())
    }

    /// Point at `t` along the top edge (p0 to p1).
    #[must_use]
    pub fn p0p1(&self, t: f64) -> Vector2 {
        Vector2::new(self.left + self.width * t, self.top)
    }

    /// Point at `t` along the right edge (p1 to p2).
    #[must_use]
    pub fn p1p2(&self, t: f64) -> Vector2 {
        Vector2::new(self.right(), self.top + self.height * t)
    }

    /// Point at `t` along the bottom edge, measured from the left.
    #[must_use]
    pub fn p2p3(&self, t: f64) -> Vector2 {
        Vector2::new(self.left + self.width * t, self.bottom())
    }

    /// Point at `t` along the left edge (p0 to p3).
    #[must_use]
    pub fn p0p3(&self, t: f64) -> Vector2 {
        Vector2::new(self.left, self.top + self.height * t)
    }

    #[must_use]
    pub fn aligned_point(&self, alignment: Alignment) -> Vector2 {
        Vector2::new(
            self.left + alignment.align_x * self.width,
            self.top + alignment.align_y * self.height,
        )
    }

    /// Inclusive containment: points on the edges are inside.
    #[must_use]
    pub fn contains(&self, position: Vector2) -> bool {
        position.x >= self.left
            && position.x <= self.right()
            && position.y >= self.top
            && position.y <= self.bottom()
    }

    /// Overlap of both areas; a zero-sized area when they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &LayoutArea) -> LayoutArea {
        Self::from_corners(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Shrinks the area by `delta` on every side.
    #[must_use]
    pub fn adjust_margins(&self, delta: f64) -> LayoutArea {
        self.adjust_margins_xy(delta, delta)
    }

    /// Shrinks the area by `delta_x` left/right and `delta_y` top/bottom.
    #[must_use]
    pub fn adjust_margins_xy(&self, delta_x: f64, delta_y: f64) -> LayoutArea {
        Self::new(
            self.left + delta_x,
            self.top + delta_y,
            (self.width - 2.0 * delta_x).max(0.0),
            (self.height - 2.0 * delta_y).max(0.0),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
