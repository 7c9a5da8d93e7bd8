//! Content measurement hooks used by fixed-size layout children.
//!
//! Real glyph metrics live in the text renderer, outside this crate. Layout
//! only needs a rough bounding box, so a heuristic measurer is the default.

use std::fmt;

use crate::core::Size;
use crate::layout::LayoutContext;

/// Returns the pixel bounding box of a single-line text.
pub trait TextMeasurer: fmt::Debug {
    fn measure(&self, text: &str, font_size_px: f64) -> Size;
}

/// Fixed-advance approximation: every glyph is `glyph_width_em` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicTextMeasurer {
    pub glyph_width_em: f64,
    pub line_height_em: f64,
}

impl Default for HeuristicTextMeasurer {
    fn default() -> Self {
        Self {
            glyph_width_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let glyphs = text.chars().count() as f64;
        Size::new(
            glyphs * self.glyph_width_em * font_size_px,
            self.line_height_em * font_size_px,
        )
    }
}

/// Anything a fixed layout child can be sized by: axes, labels, legends.
pub trait ContentMeasure: fmt::Debug {
    /// Pixel size of the content for the current frame.
    fn measure(&self, context: &LayoutContext) -> Size;
}

/// A constant pixel size.
impl ContentMeasure for Size {
    fn measure(&self, _context: &LayoutContext) -> Size {
        *self
    }
}
