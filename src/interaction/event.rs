use serde::{Deserialize, Serialize};

use crate::core::Vector2;

/// Gesture vocabulary understood by listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Wheel,
    Pan,
}

/// Type-specific data of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Raw wheel delta; positive values scroll down / zoom out.
    Wheel { delta: f64 },
    /// Incremental pointer movement since the previous pan event, normalized.
    Pan { delta: Vector2 },
}

/// One queued gesture, positioned in normalized screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventValue {
    pub position: Vector2,
    pub payload: EventPayload,
}

impl EventValue {
    #[must_use]
    pub fn wheel(position: Vector2, delta: f64) -> Self {
        Self {
            position,
            payload: EventPayload::Wheel { delta },
        }
    }

    #[must_use]
    pub fn pan(position: Vector2, delta: Vector2) -> Self {
        Self {
            position,
            payload: EventPayload::Pan { delta },
        }
    }

    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self.payload {
            EventPayload::Wheel { .. } => EventType::Wheel,
            EventPayload::Pan { .. } => EventType::Pan,
        }
    }

    /// Wheel delta, or `0.0` for other gestures.
    #[must_use]
    pub fn wheel_delta(&self) -> f64 {
        match self.payload {
            EventPayload::Wheel { delta } => delta,
            EventPayload::Pan { .. } => 0.0,
        }
    }

    /// Pan delta, or zero for other gestures.
    #[must_use]
    pub fn pan_delta(&self) -> Vector2 {
        match self.payload {
            EventPayload::Pan { delta } => delta,
            EventPayload::Wheel { .. } => Vector2::ZERO,
        }
    }
}
