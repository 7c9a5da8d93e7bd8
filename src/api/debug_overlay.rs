use crate::layout::LayoutCache;
use crate::render::{Color, RenderFrame, TextHAlign, TextPrimitive, TextVAlign};

const OVERLAY_FONT_PX: f64 = 10.0;

/// Outlines every area of the current frame in a distinct palette color and
/// tags it with its node key, in calculation order.
pub fn draw_layout_debug(cache: &LayoutCache, frame: &mut RenderFrame) {
    for (index, (key, area)) in cache.iter().enumerate() {
        let color = Color::by_index(index);
        let rect = frame.area_to_rect(area, color, 1.0);
        frame.texts.push(
            TextPrimitive::new(
                key.to_string(),
                rect.x + 2.0,
                rect.y + 2.0,
                OVERLAY_FONT_PX,
                color,
                TextHAlign::Left,
            )
            .with_v_align(TextVAlign::Top),
        );
        frame.rects.push(rect);
    }
}
