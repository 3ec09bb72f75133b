//! Per-joint reference bases.
//!
//! Authored skeletons rarely agree on which local axis points along the
//! bone. A [`JointBasis`] names the two authored axes to treat as the
//! canonical forward/up pair, so the solvers can assign orientations
//! without per-joint special cases.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use skink_core::math::{self, look_rotation};

/// The authored local axes of a joint that stand in for the canonical
/// forward/up pair. Both must be unit length and orthogonal; the
/// predefined constants below cover the axis permutations the default rig
/// uses. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointBasis {
    /// Authored axis to treat as forward.
    pub forward: Vector3<f32>,
    /// Authored axis to treat as up.
    pub up: Vector3<f32>,
}

impl JointBasis {
    /// Canonical authoring: forward is forward, up is up.
    pub const FW_UP: Self = Self::new(math::FORWARD, math::UP);
    /// Left-as-forward, down-as-up (hips, spine, neck, head, tail).
    pub const LT_DN: Self = Self::new(math::LEFT, math::DOWN);
    /// Right-as-forward, forward-as-up (left hip/upper leg).
    pub const RT_FW: Self = Self::new(math::RIGHT, math::FORWARD);
    /// Left-as-forward, back-as-up (right hip/upper leg).
    pub const LT_BK: Self = Self::new(math::LEFT, math::BACK);
    /// Down-as-forward, left-as-up (left lower leg/arm).
    pub const DN_LT: Self = Self::new(math::DOWN, math::LEFT);
    /// Up-as-forward, right-as-up (right lower leg/arm).
    pub const UP_RT: Self = Self::new(math::UP, math::RIGHT);
    /// Right-as-forward, back-as-up (left shoulder girdle).
    pub const RT_BK: Self = Self::new(math::RIGHT, math::BACK);
    /// Left-as-forward, forward-as-up (right shoulder girdle).
    pub const LT_FW: Self = Self::new(math::LEFT, math::FORWARD);

    /// Basis from two authored unit axes.
    #[must_use]
    pub const fn new(forward: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self { forward, up }
    }

    /// World rotation that points this joint's treat-as-forward axis along
    /// `world_forward` with its treat-as-up axis aligned to `world_up`.
    #[must_use]
    pub fn orientation_for(
        &self,
        world_forward: &Vector3<f32>,
        world_up: &Vector3<f32>,
    ) -> UnitQuaternion<f32> {
        // R maps the authored frame onto the requested world frame:
        // (world frame from canonical) * (authored frame from canonical)^-1.
        let world = look_rotation(world_forward, world_up);
        let authored = look_rotation(&self.forward, &self.up);
        world * authored.inverse()
    }
}

impl Default for JointBasis {
    fn default() -> Self {
        Self::FW_UP
    }
}
