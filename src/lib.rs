//! gpu-chart-rs: interactive chart core.
//!
//! A normalized layout tree with a per-frame area cache, numeric scales with
//! nice-tick generation, gesture recognition with per-frame event dispatch,
//! and a basic chart layout that wires axes, scales and gestures together.
//! Drawing is left to a [`render::Renderer`] backend.

pub mod api;
pub mod axis;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod telemetry;

pub use api::{BasicChartLayout, ChartConfig, ChartRuntime};
pub use error::{ChartError, ChartResult};
