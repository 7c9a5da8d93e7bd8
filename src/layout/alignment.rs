use serde::{Deserialize, Serialize};

/// Relative anchor inside an area: `(0, 0)` is top left, `(1, 1)` bottom right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub align_x: f64,
    pub align_y: f64,
}

impl Alignment {
    pub const LEFT_TOP: Self = Self::new(0.0, 0.0);
    pub const CENTER_TOP: Self = Self::new(0.5, 0.0);
    pub const RIGHT_TOP: Self = Self::new(1.0, 0.0);
    pub const LEFT_CENTER: Self = Self::new(0.0, 0.5);
    pub const CENTER_CENTER: Self = Self::new(0.5, 0.5);
    pub const RIGHT_CENTER: Self = Self::new(1.0, 0.5);
    pub const LEFT_BOTTOM: Self = Self::new(0.0, 1.0);
    pub const CENTER_BOTTOM: Self = Self::new(0.5, 1.0);
    pub const RIGHT_BOTTOM: Self = Self::new(1.0, 1.0);

    #[must_use]
    pub const fn new(align_x: f64, align_y: f64) -> Self {
        Self { align_x, align_y }
    }

    #[must_use]
    pub const fn with_x(self, align_x: f64) -> Self {
        Self::new(align_x, self.align_y)
    }

    #[must_use]
    pub const fn with_y(self, align_y: f64) -> Self {
        Self::new(self.align_x, align_y)
    }
}
