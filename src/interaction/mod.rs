//! Input normalization, gesture recognition and per-frame event dispatch.

mod dispatcher;
mod event;
mod surface;

pub use dispatcher::{DispatchSummary, EventDispatcher, EventHandler, SharedEventHandler};
pub use event::{EventPayload, EventType, EventValue};
pub use surface::{FixedSurface, InputSurface, RawInput, SurfaceRect, TouchPoint};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Tuning for gesture recognition and gesture-to-scale mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Wheel delta that grows a zoomed range by its own width.
    #[serde(default = "default_wheel_zoom_divisor")]
    pub wheel_zoom_divisor: f64,
    /// Minimum change of the two-finger distance, in pixels, before a pinch
    /// produces a zoom step.
    #[serde(default = "default_pinch_dead_zone_px")]
    pub pinch_dead_zone_px: f64,
    /// Wheel delta emitted per pixel of pinch distance change.
    #[serde(default = "default_pinch_wheel_factor")]
    pub pinch_wheel_factor: f64,
    /// Button mask that must be held, alone, for a mouse drag to pan.
    #[serde(default = "default_primary_button_mask")]
    pub primary_button_mask: u16,
    /// Deliver events only to listeners registered for the same event type.
    ///
    /// Off by default: listeners receive every gesture that hits their area
    /// and decide from the payload whether to act.
    #[serde(default)]
    pub match_listener_event_type: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wheel_zoom_divisor: default_wheel_zoom_divisor(),
            pinch_dead_zone_px: default_pinch_dead_zone_px(),
            pinch_wheel_factor: default_pinch_wheel_factor(),
            primary_button_mask: default_primary_button_mask(),
            match_listener_event_type: false,
        }
    }
}

impl InteractionConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.wheel_zoom_divisor.is_finite() || self.wheel_zoom_divisor <= 0.0 {
            return Err(ChartError::InvalidData(
                "wheel_zoom_divisor must be finite and > 0".to_owned(),
            ));
        }
        if !self.pinch_dead_zone_px.is_finite() || self.pinch_dead_zone_px < 0.0 {
            return Err(ChartError::InvalidData(
                "pinch_dead_zone_px must be finite and >= 0".to_owned(),
            ));
        }
        if !self.pinch_wheel_factor.is_finite() || self.pinch_wheel_factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "pinch_wheel_factor must be finite and > 0".to_owned(),
            ));
        }
        if self.primary_button_mask == 0 {
            return Err(ChartError::InvalidData(
                "primary_button_mask must not be empty".to_owned(),
            ));
        }
        Ok(self)
    }

    /// `zoom` fraction for a wheel delta: the range grows by
    /// `delta / wheel_zoom_divisor` of its width, half on each side.
    #[must_use]
    pub fn wheel_zoom_fraction(self, wheel_delta: f64) -> f64 {
        wheel_delta / self.wheel_zoom_divisor / 2.0
    }
}

fn default_wheel_zoom_divisor() -> f64 {
    600.0
}

fn default_pinch_dead_zone_px() -> f64 {
    3.0
}

fn default_pinch_wheel_factor() -> f64 {
    2.0
}

fn default_primary_button_mask() -> u16 {
    1
}
