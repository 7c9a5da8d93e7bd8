use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Drops frames that arrive sooner than `1000 / max_frame_rate` ms after the
/// last rendered one.
///
/// Timestamps come from the host's frame clock and may jump backwards (e.g.
/// after a clock reset), so the distance is taken as an absolute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameThrottle {
    max_frame_rate: f64,
    frame_delay_ms: f64,
    last_frame_ms: Option<f64>,
}

impl FrameThrottle {
    pub fn new(max_frame_rate: f64) -> ChartResult<Self> {
        let mut throttle = Self {
            max_frame_rate: 0.0,
            frame_delay_ms: 0.0,
            last_frame_ms: None,
        };
        throttle.set_max_frame_rate(max_frame_rate)?;
        Ok(throttle)
    }

    pub fn set_max_frame_rate(&mut self, max_frame_rate: f64) -> ChartResult<()> {
        if !max_frame_rate.is_finite() || max_frame_rate <= 0.0 {
            return Err(ChartError::InvalidData(
                "max frame rate must be finite and > 0".to_owned(),
            ));
        }
        self.max_frame_rate = max_frame_rate;
        self.frame_delay_ms = 1000.0 / max_frame_rate;
        Ok(())
    }

    #[must_use]
    pub fn max_frame_rate(&self) -> f64 {
        self.max_frame_rate
    }

    #[must_use]
    pub fn frame_delay_ms(&self) -> f64 {
        self.frame_delay_ms
    }

    /// Returns whether a frame at `time_ms` should render, and records it as
    /// the last rendered frame if so. The first frame always renders.
    pub fn should_render(&mut self, time_ms: f64) -> bool {
        if let Some(last) = self.last_frame_ms {
            let elapsed = (time_ms - last).abs();
            if elapsed <= self.frame_delay_ms {
                trace!(elapsed, delay = self.frame_delay_ms, "frame throttled");
                return false;
            }
        }
        self.last_frame_ms = Some(time_ms);
        true
    }

    /// Forgets the last frame so the next one renders unconditionally.
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self {
            max_frame_rate: 100.0,
            frame_delay_ms: 10.0,
            last_frame_ms: None,
        }
    }
}
