//! Step trajectory: a single arcing relocation of a foot or hand.
//!
//! The trajectory is a quadratic Bezier whose control point sits above the
//! straight-line midpoint by the travel distance, so longer steps lift
//! higher. Progress is eased with a smoothstep over a duration
//! proportional to the travel distance, and the landing endpoint is
//! re-evaluated every frame so the foot tracks its moving home position.

use nalgebra::Vector3;

use skink_core::math::{self, quadratic_bezier, smoothstep01};
use skink_core::task::{Countdown, Span};

/// Seconds of step duration per length unit of travel distance.
pub const STEP_DURATION_PER_UNIT: f32 = 12.0;

/// Fraction of the step after which the mirrored partner may begin its own
/// step.
pub const BLOCKING_RELEASE_FRACTION: f32 = 0.4;

/// Deterministic step duration for a given travel distance.
#[must_use]
pub fn step_duration(distance: f32) -> f32 {
    STEP_DURATION_PER_UNIT * distance.max(0.0)
}

/// Result of advancing a step by one frame.
#[derive(Debug, Clone, Copy)]
pub struct StepTick {
    /// Where the effector should be this frame.
    pub position: Vector3<f32>,
    /// True on the tick where the 40% blocking window expires.
    pub release_blocking: bool,
    /// True on the tick where the step completes.
    pub finished: bool,
}

/// An in-flight step animation.
#[derive(Debug, Clone)]
pub struct StepAnimation {
    start: Vector3<f32>,
    lift: f32,
    span: Span,
    release: Countdown,
}

impl StepAnimation {
    /// Begin a step from `start` over `distance` length units.
    #[must_use]
    pub fn new(start: Vector3<f32>, distance: f32) -> Self {
        let duration = step_duration(distance);
        Self {
            start,
            lift: distance.max(0.0),
            span: Span::new(duration),
            release: Countdown::new(duration * BLOCKING_RELEASE_FRACTION),
        }
    }

    /// Advance by `dt`, landing at the current `end` position.
    ///
    /// Must not be called again after a tick with `finished` set.
    pub fn tick(&mut self, dt: f32, end: &Vector3<f32>) -> StepTick {
        let release_blocking = self.release.tick(dt);
        match self.span.tick(dt) {
            Some(progress) => {
                let eased = smoothstep01(progress);
                let control =
                    (self.start + end) * 0.5 + math::UP * self.lift;
                let finished = self.span.is_finished();
                StepTick {
                    position: quadratic_bezier(&self.start, &control, end, eased),
                    // A step never outlives its release window.
                    release_blocking: release_blocking || finished,
                    finished,
                }
            }
            None => StepTick {
                position: *end,
                release_blocking,
                finished: true,
            },
        }
    }

    /// Abort the step immediately.
    pub const fn cancel(&mut self) {
        self.span.cancel();
        self.release.cancel();
    }

    /// Total step duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.span.duration()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
