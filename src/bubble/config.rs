//! Engine tuning: diameter range, shape metrics, colors and durations.

use std::fmt;

use bevy::prelude::Resource;
use serde::Deserialize;

use super::scene::MessageDirection;

const BUBBLE_JSON: &str = include_str!("../../assets/bubble.json");

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    InvalidValue { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Failed to parse bubble config: {}", msg),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value {} for bubble config field `{}`", value, field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Shared by every bubble; inserted as a resource at startup.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub min_diameter: f64,
    pub max_diameter: f64,
    /// Corner radius of the content rectangle.
    pub corner_radius: f64,
    /// Padding around the content while thinking; shrinks to 0 while talking.
    pub base_padding: f64,
    pub blur_radius: f64,

    pub inbound_color: [f32; 4],
    pub outbound_color: [f32; 4],
    /// Fill used instead of the direction color when packing is infeasible.
    pub invalid_tint: [f32; 4],

    pub circle_transition_secs: f64,
    pub morph_secs: f64,
    pub resize_secs: f64,
    /// Grace after a morph's nominal end before a queued resize is applied.
    pub resize_cutoff_secs: f64,
    pub oscillation_period_secs: f64,
    pub rotation_period_secs: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_diameter: 18.0,
            max_diameter: 34.0,
            corner_radius: 18.0,
            base_padding: 10.0,
            blur_radius: 6.0,
            inbound_color: [0.89, 0.90, 0.93, 1.0],
            outbound_color: [0.24, 0.52, 0.98, 1.0],
            invalid_tint: [0.95, 0.35, 0.25, 1.0],
            circle_transition_secs: 0.45,
            morph_secs: 0.6,
            resize_secs: 0.35,
            resize_cutoff_secs: 0.05,
            oscillation_period_secs: 2.4,
            rotation_period_secs: 18.0,
        }
    }
}

impl BubbleConfig {
    /// Load the configuration embedded from `assets/bubble.json`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_json(BUBBLE_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BubbleConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot animate with.
    ///
    /// A swapped diameter range is accepted here: the packer normalizes it
    /// and flags the result invalid so the bubble renders tinted.
    ///
    /// The outline may not resize slower than circles appear and fade, or the
    /// circles could not keep up with the outline they tile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_diameter", self.min_diameter),
            ("max_diameter", self.max_diameter),
            ("circle_transition_secs", self.circle_transition_secs),
            ("morph_secs", self.morph_secs),
            ("resize_secs", self.resize_secs),
            ("oscillation_period_secs", self.oscillation_period_secs),
            ("rotation_period_secs", self.rotation_period_secs),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if self.resize_secs > self.circle_transition_secs {
            return Err(ConfigError::InvalidValue {
                field: "resize_secs",
                value: self.resize_secs,
            });
        }

        let non_negative = [
            ("corner_radius", self.corner_radius),
            ("base_padding", self.base_padding),
            ("blur_radius", self.blur_radius),
            ("resize_cutoff_secs", self.resize_cutoff_secs),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        Ok(())
    }

    pub fn fill_color(&self, direction: MessageDirection) -> [f32; 4] {
        match direction {
            MessageDirection::Inbound => self.inbound_color,
            MessageDirection::Outbound => self.outbound_color,
        }
    }
}
