use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::error::{ChartError, ChartResult};
use crate::interaction::InteractionConfig;

/// Chart bootstrap configuration.
///
/// Serializable so hosts can keep chart setup in a JSON file; every field has
/// a default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_interaction")]
    pub interaction: InteractionConfig,
    #[serde(default = "default_axes")]
    pub axes: AxisConfig,
    /// Upper bound for rendered frames per second.
    #[serde(default = "default_max_frame_rate")]
    pub max_frame_rate: f64,
    /// Outline every cached layout area on top of the frame.
    #[serde(default)]
    pub debug_layout: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            interaction: default_interaction(),
            axes: default_axes(),
            max_frame_rate: default_max_frame_rate(),
            debug_layout: false,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    #[must_use]
    pub fn with_axes(mut self, axes: AxisConfig) -> Self {
        self.axes = axes;
        self
    }

    #[must_use]
    pub fn with_max_frame_rate(mut self, max_frame_rate: f64) -> Self {
        self.max_frame_rate = max_frame_rate;
        self
    }

    #[must_use]
    pub fn with_debug_layout(mut self, debug_layout: bool) -> Self {
        self.debug_layout = debug_layout;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.interaction.validate()?;
        self.axes.validate()?;
        if !self.max_frame_rate.is_finite() || self.max_frame_rate <= 0.0 {
            return Err(ChartError::InvalidData(
                "max_frame_rate must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_interaction() -> InteractionConfig {
    InteractionConfig::default()
}

fn default_axes() -> AxisConfig {
    AxisConfig::default()
}

fn default_max_frame_rate() -> f64 {
    100.0
}
