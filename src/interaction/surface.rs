use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Bounding box of the input element in client (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Host element that raw input is captured from.
///
/// The dispatcher only needs a stable identity (to ignore redundant binds)
/// and the current bounding box (to normalize client coordinates).
pub trait InputSurface: fmt::Debug {
    fn id(&self) -> u64;
    fn bounding_rect(&self) -> SurfaceRect;
}

/// Surface with a host-updated bounding box, for headless hosts and tests.
#[derive(Debug)]
pub struct FixedSurface {
    id: u64,
    rect: Cell<SurfaceRect>,
}

impl FixedSurface {
    #[must_use]
    pub fn new(id: u64, rect: SurfaceRect) -> Self {
        Self {
            id,
            rect: Cell::new(rect),
        }
    }

    /// Call after the element was resized or moved.
    pub fn set_rect(&self, rect: SurfaceRect) {
        self.rect.set(rect);
    }
}

impl InputSurface for FixedSurface {
    fn id(&self) -> u64 {
        self.id
    }

    fn bounding_rect(&self) -> SurfaceRect {
        self.rect.get()
    }
}

/// One active touch point in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(id: u64, client_x: f64, client_y: f64) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// Raw input as delivered by the host, before gesture recognition.
///
/// Touch variants carry every touch still on the surface after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    Wheel {
        client_x: f64,
        client_y: f64,
        delta_y: f64,
    },
    MouseDown {
        client_x: f64,
        client_y: f64,
        buttons: u16,
    },
    MouseMove {
        client_x: f64,
        client_y: f64,
        buttons: u16,
    },
    MouseUp,
    MouseLeave,
    TouchStart {
        touches: Vec<TouchPoint>,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    TouchEnd {
        touches: Vec<TouchPoint>,
    },
}
