//! Frame clock with smoothed delta time.
//!
//! Tracks elapsed time as an integer nanosecond count to avoid
//! floating-point accumulation drift, and maintains an exponentially
//! smoothed per-frame delta. The turn controller consumes the smoothed
//! delta so a single long frame does not snap the body around.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Default smoothing factor for the exponential moving average of the
/// frame delta. Smaller values smooth harder.
pub const DEFAULT_DELTA_SMOOTHING: f32 = 0.1;

/// Per-frame clock for the character update pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
pub struct FrameClock {
    elapsed_nanos: u64,
    delta: f32,
    smooth_delta: f32,
    smoothing: f32,
    ticks: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Clock at zero with the default smoothing factor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_nanos: 0,
            delta: 0.0,
            smooth_delta: 0.0,
            smoothing: DEFAULT_DELTA_SMOOTHING,
            ticks: 0,
        }
    }

    /// Override the smoothing factor (clamped to (0, 1]).
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(1.0e-3, 1.0);
        self
    }

    /// Advance the clock by one frame of `delta_secs` seconds.
    ///
    /// Negative deltas are treated as zero. The first tick seeds the
    /// smoothed delta directly so it does not ramp up from zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick(&mut self, delta_secs: f32) {
        let delta = delta_secs.max(0.0);
        self.elapsed_nanos = self
            .elapsed_nanos
            .saturating_add((f64::from(delta) * 1_000_000_000.0) as u64);
        self.delta = delta;
        self.smooth_delta = if self.ticks == 0 {
            delta
        } else {
            self.smooth_delta + (delta - self.smooth_delta) * self.smoothing
        };
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Raw delta of the last frame in seconds.
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Exponentially smoothed delta in seconds.
    #[must_use]
    pub const fn smooth_delta(&self) -> f32 {
        self.smooth_delta
    }

    /// Total elapsed time in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_nanos as f64 / 1_000_000_000.0
    }

    /// Total elapsed nanoseconds.
    #[must_use]
    pub const fn elapsed_nanos(&self) -> u64 {
        self.elapsed_nanos
    }

    /// Number of ticks since construction or the last reset.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reset the clock to zero.
    pub const fn reset(&mut self) {
        self.elapsed_nanos = 0;
        self.delta = 0.0;
        self.smooth_delta = 0.0;
        self.ticks = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
