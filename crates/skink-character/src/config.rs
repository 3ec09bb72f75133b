//! Character tuning, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use skink_core::error::ConfigError;
use skink_gait::GaitConfig;
use skink_steer::{SteerConfig, TargetConfig};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_turn_speed() -> f32 {
    0.8
}
const fn default_alignment_dot() -> f32 {
    0.999
}
const fn default_half() -> f32 {
    0.5
}
const fn default_step_trigger_distance() -> f32 {
    0.02
}
const fn default_target_radius() -> f32 {
    0.3
}
const fn default_target_approach() -> f32 {
    0.1
}
const fn default_bob_amplitude() -> f32 {
    0.05
}
const fn default_bob_period() -> f32 {
    2.0
}

// ---------------------------------------------------------------------------
// CharacterConfig
// ---------------------------------------------------------------------------

/// All character tuning in one place. Every field has a default matching
/// the reference behavior; load overrides from TOML with
/// [`from_toml_str`](Self::from_toml_str).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Body turn rate, fraction of the remaining angle per second.
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,

    /// Forward-dot threshold above which the body counts as aligned.
    #[serde(default = "default_alignment_dot")]
    pub alignment_dot: f32,

    /// Spine blend toward the target direction.
    #[serde(default = "default_half")]
    pub spine_blend: f32,

    /// Tail blend toward the reflected target direction.
    #[serde(default = "default_half")]
    pub tail_blend: f32,

    /// Per-frame head gaze blend.
    #[serde(default = "default_half")]
    pub gaze_blend: f32,

    /// Spine/tail relaxation toward rest per solve.
    #[serde(default = "default_half")]
    pub stickiness: f32,

    /// Foot drift from its anchor that triggers a step.
    #[serde(default = "default_step_trigger_distance")]
    pub step_trigger_distance: f32,

    /// Target sphere radius cap around the character.
    #[serde(default = "default_target_radius")]
    pub target_radius: f32,

    /// Per-frame drag easing toward the resolved touch point.
    #[serde(default = "default_target_approach")]
    pub target_approach: f32,

    /// Idle target bobbing amplitude.
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,

    /// Idle target bobbing period in seconds.
    #[serde(default = "default_bob_period")]
    pub bob_period: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            turn_speed: default_turn_speed(),
            alignment_dot: default_alignment_dot(),
            spine_blend: default_half(),
            tail_blend: default_half(),
            gaze_blend: default_half(),
            stickiness: default_half(),
            step_trigger_distance: default_step_trigger_distance(),
            target_radius: default_target_radius(),
            target_approach: default_target_approach(),
            bob_amplitude: default_bob_amplitude(),
            bob_period: default_bob_period(),
        }
    }
}

impl CharacterConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate tuning values. Invalid values abort character
    /// construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("must be positive and finite, got {value}"),
                })
            }
        }
        fn fraction(field: &str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("must be in [0, 1], got {value}"),
                })
            }
        }

        positive("turn_speed", self.turn_speed)?;
        fraction("alignment_dot", self.alignment_dot)?;
        fraction("spine_blend", self.spine_blend)?;
        fraction("tail_blend", self.tail_blend)?;
        fraction("gaze_blend", self.gaze_blend)?;
        fraction("stickiness", self.stickiness)?;
        positive("step_trigger_distance", self.step_trigger_distance)?;
        positive("target_radius", self.target_radius)?;
        fraction("target_approach", self.target_approach)?;
        positive("bob_period", self.bob_period)?;
        if !self.bob_amplitude.is_finite() || self.bob_amplitude < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "bob_amplitude".into(),
                message: format!("must be non-negative, got {}", self.bob_amplitude),
            });
        }
        Ok(())
    }

    /// Steering sub-config.
    #[must_use]
    pub const fn steer(&self) -> SteerConfig {
        SteerConfig {
            turn_speed: self.turn_speed,
            alignment_dot: self.alignment_dot,
            spine_blend: self.spine_blend,
            tail_blend: self.tail_blend,
            gaze_blend: self.gaze_blend,
        }
    }

    /// Gait sub-config.
    #[must_use]
    pub const fn gait(&self) -> GaitConfig {
        GaitConfig {
            trigger_distance: self.step_trigger_distance,
        }
    }

    /// Target tracking sub-config.
    #[must_use]
    pub const fn target(&self) -> TargetConfig {
        TargetConfig {
            radius: self.target_radius,
            approach: self.target_approach,
            bob_amplitude: self.bob_amplitude,
            bob_period: self.bob_period,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
