pub mod line_series;
pub mod scale;
pub mod types;

pub use line_series::{LineSegment, project_line_segments};
pub use scale::{Scale, SharedScale, format_tick_label};
pub use types::{DataPoint, Size, Vector2, Viewport};
