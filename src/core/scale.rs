use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{ChartError, ChartResult};

/// Scale shared between an axis, its renderers and the gesture listeners.
///
/// Everything runs on the frame thread, so a `RefCell` is enough to give the
/// gesture layer exclusive write access while renderers only borrow.
pub type SharedScale = Rc<RefCell<Scale>>;

/// Ranges smaller than this produce a single tick at `min`.
const DEGENERATE_RANGE_ABS: f64 = 1e-10;
/// Per-tick footprint, in letters, when label widths are ignored.
const FIXED_TICK_LETTERS: f64 = 2.0;
/// Letters added around each measured label.
const LABEL_PADDING_LETTERS: usize = 2;
/// Upper bound on steps walked while emitting ticks.
const MAX_TICK_WALK: u64 = 10_000;

/// Numeric domain `[min, max]` of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    /// Creates a scale without reordering the bounds.
    ///
    /// `min > max` yields a negative range (a reversed axis) until
    /// [`Scale::set_range`] normalizes it. Both bounds and `max - min` must
    /// be finite.
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        check_bounds(min, max)?;
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn into_shared(self) -> SharedScale {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Maps `value` from the system `[min_value, max_value]` onto this scale.
    pub fn value_at(&self, min_value: f64, value: f64, max_value: f64) -> ChartResult<f64> {
        let span = max_value - min_value;
        if !span.is_finite() || span == 0.0 || !value.is_finite() {
            return Err(ChartError::InvalidData(
                "value_at requires a finite value and a finite, non-zero source span".to_owned(),
            ));
        }
        let relative = (value - min_value) / span;
        Ok(self.min + self.range() * relative)
    }

    /// Shifts both bounds by `fraction * range`.
    ///
    /// A positive fraction moves the visible window towards smaller values,
    /// matching content that follows a drag in the positive direction.
    pub fn pan(&mut self, fraction: f64) -> ChartResult<()> {
        let shift = self.checked_offset(fraction, "pan")?;
        self.apply(self.min - shift, self.max - shift)
    }

    /// Expands (`fraction > 0`) or contracts (`fraction < 0`) both ends by
    /// `fraction * range`. No clamping is applied.
    pub fn zoom(&mut self, fraction: f64) -> ChartResult<()> {
        let offset = self.checked_offset(fraction, "zoom")?;
        self.apply(self.min - offset, self.max + offset)
    }

    /// Replaces one or both bounds; the result is always ordered `min <= max`.
    pub fn set_range(&mut self, min: Option<f64>, max: Option<f64>) -> ChartResult<()> {
        let min = min.unwrap_or(self.min);
        let max = max.unwrap_or(self.max);
        if min <= max {
            self.apply(min, max)
        } else {
            self.apply(max, min)
        }
    }

    /// Returns human-friendly tick values (1/2/5 steps) for an axis that has
    /// `available_px` pixels and renders digits `letter_px` pixels wide.
    ///
    /// The step is refined from a power of ten: first grown while the label
    /// footprint overflows the space, then shrunk while there is slack.
    /// With `ignore_label_width` every tick reserves two letters, which suits
    /// axes where labels stack along the text height.
    pub fn calculate_ticks(
        &self,
        letter_px: f64,
        available_px: f64,
        ignore_label_width: bool,
    ) -> ChartResult<Vec<f64>> {
        if !letter_px.is_finite() || letter_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "tick letter size must be finite and > 0".to_owned(),
            ));
        }
        if !available_px.is_finite() || available_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "tick space must be finite and > 0".to_owned(),
            ));
        }

        let range = self.range();
        if !range.is_finite() {
            return Err(ChartError::InvalidData(
                "tick generation requires a finite scale range".to_owned(),
            ));
        }
        if range.abs() < DEGENERATE_RANGE_ABS {
            return Ok(vec![self.min]);
        }

        let magnitude = 10_f64.powf(range.abs().log10().floor());
        let mut step = magnitude.copysign(range);
        if !step.is_finite() || step == 0.0 {
            return Err(ChartError::InvalidData(
                "tick step must be finite and non-zero".to_owned(),
            ));
        }

        let footprint = |step: f64| self.label_footprint(step, letter_px, ignore_label_width);

        for factor in [5.0, 2.0] {
            while self.tick_slots(step) > 1.0 && footprint(step * factor) > available_px {
                step *= factor;
            }
        }
        for factor in [5.0, 2.0] {
            while footprint(step / factor) < available_px {
                step /= factor;
            }
        }

        let ticks = self.ticks_for_step(step);
        trace!(
            min = self.min,
            max = self.max,
            step,
            count = ticks.len(),
            "calculated scale ticks"
        );
        Ok(ticks)
    }

    fn tick_slots(&self, step: f64) -> f64 {
        (self.range() / step).ceil()
    }

    fn label_footprint(&self, step: f64, letter_px: f64, ignore_label_width: bool) -> f64 {
        let tick_px = if ignore_label_width {
            letter_px * FIXED_TICK_LETTERS
        } else {
            let first = (self.min / step).round() * step;
            let second = first + step;
            let letters = format_tick_label(first)
                .chars()
                .count()
                .max(format_tick_label(second).chars().count())
                + LABEL_PADDING_LETTERS;
            letters as f64 * letter_px
        };
        tick_px * self.tick_slots(step)
    }

    fn ticks_for_step(&self, step: f64) -> Vec<f64> {
        let ascending = step > 0.0;
        let start = (self.min / step).round() * step;
        let mut ticks: Vec<f64> = Vec::new();

        for index in 0..MAX_TICK_WALK {
            let value = start + index as f64 * step;
            if !value.is_finite() {
                break;
            }

            let (past_end, inside) = if ascending {
                (value > self.max, value >= self.min)
            } else {
                (value < self.max, value <= self.min)
            };
            if past_end {
                break;
            }
            if inside && ticks.last() != Some(&value) {
                ticks.push(value);
            }
            if index + 1 == MAX_TICK_WALK {
                warn!(step, min = self.min, max = self.max, "tick walk truncated");
            }
        }

        ticks
    }

    fn checked_offset(&self, fraction: f64, operation: &str) -> ChartResult<f64> {
        if !fraction.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "{operation} fraction must be finite"
            )));
        }
        Ok(self.range() * fraction)
    }

    /// Commits new bounds, leaving the scale untouched when they are invalid.
    fn apply(&mut self, min: f64, max: f64) -> ChartResult<()> {
        check_bounds(min, max)?;
        self.min = min;
        self.max = max;
        Ok(())
    }
}

fn check_bounds(min: f64, max: f64) -> ChartResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ChartError::InvalidData(
            "scale bounds must be finite".to_owned(),
        ));
    }
    if !(max - min).is_finite() {
        return Err(ChartError::InvalidData(format!(
            "scale range overflows between {min} and {max}"
        )));
    }
    Ok(())
}

/// Formats a tick value for display: at most three fraction digits,
/// comma-grouped thousands, trailing zeros trimmed.
#[must_use]
pub fn format_tick_label(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut label = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if rounded < 0.0 {
        label.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            label.push(',');
        }
        label.push(digit);
    }
    if !fraction.is_empty() {
        label.push('.');
        label.push_str(fraction);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_group_thousands_and_trim_fraction() {
        assert_eq!(format_tick_label(0.0), "0");
        assert_eq!(format_tick_label(-0.0001), "0");
        assert_eq!(format_tick_label(1234.5), "1,234.5");
        assert_eq!(format_tick_label(-1_000_000.0), "-1,000,000");
        assert_eq!(format_tick_label(0.125_4), "0.125");
        assert_eq!(format_tick_label(999.0), "999");
    }

    #[test]
    fn tick_slots_follow_range_sign() {
        let scale = Scale::new(10.0, 0.0).expect("valid scale");
        assert_eq!(scale.tick_slots(-2.0), 5.0);
    }
}
