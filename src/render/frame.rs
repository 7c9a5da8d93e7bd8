use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutArea;
use crate::render::{Color, LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass, in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    /// Pixel rectangle covered by a normalized layout area.
    #[must_use]
    pub fn area_to_rect(&self, area: LayoutArea, stroke: Color, stroke_width: f64) -> RectPrimitive {
        RectPrimitive::outlined(
            self.viewport.to_pixels(area.left),
            self.viewport.to_pixels(area.top),
            self.viewport.to_pixels(area.width),
            self.viewport.to_pixels(area.height),
            stroke,
            stroke_width,
        )
    }

    /// Line between two normalized points.
    pub fn push_normalized_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        stroke_width: f64,
        color: Color,
    ) {
        let px = |value: f64| self.viewport.to_pixels(value);
        let line = LinePrimitive::new(px(from.0), px(from.1), px(to.0), px(to.1), stroke_width, color);
        self.lines.push(line);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.rects.clear();
        self.texts.clear();
    }
}
