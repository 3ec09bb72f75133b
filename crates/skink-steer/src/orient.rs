//! Body turning, spine/tail curvature, and head gaze.
//!
//! Runs first in the frame pipeline: it turns the character's heading
//! toward the target and recomputes the spine and tail chain targets that
//! the solve stage consumes. Gaze is applied separately, after the spine
//! solve, so the head keeps tracking even on frames where the body is
//! already aligned.

use nalgebra::{Unit, Vector3};

use skink_core::math::{
    self, flatten_horizontal, look_rotation, reflect_vector, rotate_dir_towards, rotate_towards,
};
use skink_ik::IkChain;
use skink_rig::{JointRole, Skeleton};

/// Orientation tuning. Defaults match the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteerConfig {
    /// Turn rate as a fraction of the remaining angle per second.
    pub turn_speed: f32,
    /// Forward-dot-to-target above which the body counts as aligned and
    /// body/spine/tail reorientation is skipped for the frame.
    pub alignment_dot: f32,
    /// Blend fraction from the rest spine direction toward the target
    /// direction.
    pub spine_blend: f32,
    /// Blend fraction from straight-back toward the reflected target
    /// direction for the tail.
    pub tail_blend: f32,
    /// Per-frame blend of the head toward looking at the target.
    pub gaze_blend: f32,
}

impl Default for SteerConfig {
    fn default() -> Self {
        Self {
            turn_speed: 0.8,
            alignment_dot: 0.999,
            spine_blend: 0.5,
            tail_blend: 0.5,
            gaze_blend: 0.5,
        }
    }
}

/// What the orientation pass did this frame.
#[derive(Debug, Clone, Copy)]
pub struct SteerOutcome {
    /// The body counted as aligned; spine/tail targets were left alone.
    pub aligned: bool,
    /// Forward-dot-to-target measured before any turning.
    pub dot: f32,
}

/// Per-frame body/spine/tail orientation controller.
#[derive(Debug, Clone)]
pub struct OrientationController {
    config: SteerConfig,
    /// Rest world length of the spine chain (root to tip), captured once.
    spine_rest_len: f32,
    /// Rest world length of the tail chain, captured once.
    tail_rest_len: f32,
}

impl OrientationController {
    /// Capture rest chain lengths from the freshly built spine and tail.
    #[must_use]
    pub fn new(
        config: SteerConfig,
        spine: &IkChain,
        tail: &IkChain,
        skeleton: &Skeleton,
    ) -> Self {
        let spine_rest_len =
            (spine.rest_effector_world(skeleton) - spine.root_world(skeleton)).norm();
        let tail_rest_len =
            (tail.rest_effector_world(skeleton) - tail.root_world(skeleton)).norm();
        Self {
            config,
            spine_rest_len,
            tail_rest_len,
        }
    }

    /// Turn the body toward `target` and refresh the spine and tail chain
    /// targets. `smooth_dt` is the smoothed frame delta.
    pub fn update(
        &self,
        skeleton: &mut Skeleton,
        spine: &mut IkChain,
        tail: &mut IkChain,
        target: &Vector3<f32>,
        smooth_dt: f32,
    ) -> SteerOutcome {
        let Some(dir) = flatten_horizontal(&(target - skeleton.body_position())) else {
            // Target directly above or on the character: nothing to turn to.
            return SteerOutcome {
                aligned: true,
                dot: 1.0,
            };
        };

        let dot = skeleton.body_forward().dot(dir.as_ref());
        if dot >= self.config.alignment_dot {
            // Hysteresis against jitter near alignment.
            return SteerOutcome { aligned: true, dot };
        }

        // 1) Body heading.
        let facing = look_rotation(&dir, &math::UP);
        let progress = (self.config.turn_speed * smooth_dt).clamp(0.0, 1.0);
        let rotation = rotate_towards(&skeleton.body_rotation(), &facing, progress);
        skeleton.set_body_rotation(rotation);

        // 2) Spine target: blend the rest direction toward the target
        // direction, keep the rest length.
        let spine_root = spine.root_world(skeleton);
        if let Some(rest_dir) = math::dir_to(&spine_root, &spine.rest_effector_world(skeleton)) {
            let spine_dir = rotate_dir_towards(&rest_dir, &dir, self.config.spine_blend);
            spine.set_target(spine_root + spine_dir.as_ref() * self.spine_rest_len);
        }

        // 3) Tail target: the reflection of the reversed target direction
        // across the sagittal plane, so the tail counter-curves away from
        // the turn; sharper turns shorten its reach.
        let tail_root = tail.root_world(skeleton);
        let sagittal = Unit::new_normalize(skeleton.body_right());
        let reflected = reflect_vector(&-dir.into_inner(), &sagittal);
        if let Some(reflected) = Unit::try_new(reflected, math::DIR_EPSILON) {
            let back = Unit::new_normalize(skeleton.body_back());
            let tail_dir = rotate_dir_towards(&back, &reflected, self.config.tail_blend);
            let reach = self.tail_rest_len * (dot * 0.1 + 0.9);
            tail.set_target(tail_root + tail_dir.as_ref() * reach);
        }

        SteerOutcome {
            aligned: false,
            dot,
        }
    }

    /// Rotate the head toward looking at `target` by the gaze blend.
    ///
    /// Applied every frame regardless of body alignment, after the spine
    /// solve so the solve's tip orientation does not overwrite it.
    pub fn apply_gaze(&self, skeleton: &mut Skeleton, target: &Vector3<f32>) {
        let Some(neck) = skeleton.index_of(JointRole::Neck) else {
            return;
        };
        let neck_pos = skeleton.world_position(neck);
        let Some(dir) = math::dir_to(&neck_pos, target) else {
            return;
        };
        let desired = skeleton
            .joint(neck)
            .basis
            .orientation_for(dir.as_ref(), &math::UP);
        let blended = rotate_towards(
            &skeleton.world_rotation(neck),
            &desired,
            self.config.gaze_blend,
        );
        skeleton.set_world_rotation(neck, blended);
    }

    /// Rest spine chain length captured at construction.
    #[must_use]
    pub const fn spine_rest_len(&self) -> f32 {
        self.spine_rest_len
    }

    /// Rest tail chain length captured at construction.
    #[must_use]
    pub const fn tail_rest_len(&self) -> f32 {
        self.tail_rest_len
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
