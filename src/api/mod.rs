//! Chart-level building blocks: configuration, the basic chart layout, frame
//! throttling, hover overlays and the per-frame runtime.

mod chart_layout;
mod config;
mod debug_overlay;
mod runtime;
mod series;
mod throttle;
mod tooltip;

pub use chart_layout::{BasicChartLayout, ChartRegions, YAxisLayout};
pub use config::ChartConfig;
pub use debug_overlay::draw_layout_debug;
pub use runtime::{ChartRuntime, FrameState, RenderCallback};
pub use series::LineSeries;
pub use throttle::FrameThrottle;
pub use tooltip::{TooltipLine, TooltipMarkers};
