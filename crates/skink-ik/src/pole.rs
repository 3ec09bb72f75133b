//! Pole targets and orientation assignment.
//!
//! Solved positions leave a full twist degree of freedom undetermined for
//! any chain longer than one bone. The pole resolver fixes it: a pole
//! target offset from the chain disambiguates the bend plane, and each
//! joint's final rotation is derived from its solved segment direction
//! plus a per-node up vector, written back through the skeleton's
//! transform interface.

use nalgebra::{Unit, Vector3};

use skink_core::math::{self, dir_to, plane_normal, rotate_towards};
use skink_rig::Skeleton;

use crate::chain::{IkChain, UpSource};

// ---------------------------------------------------------------------------
// PoleSpec
// ---------------------------------------------------------------------------

/// Fractional pole offsets for one chain, all scaled by chain length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleSpec {
    /// Root-to-tip interpolation fraction for the pole base point.
    pub along: f32,
    /// Sideways offset fraction; the side is mirrored for right chains.
    pub lateral: f32,
    /// Offset fraction along the body forward axis (negative = backward).
    pub axial: f32,
}

impl PoleSpec {
    /// Pole with lateral and axial offsets.
    #[must_use]
    pub const fn new(along: f32, lateral: f32, axial: f32) -> Self {
        Self {
            along,
            lateral,
            axial,
        }
    }

    /// Pole on the chain itself (spine/tail style).
    #[must_use]
    pub const fn along_only(along: f32) -> Self {
        Self::new(along, 0.0, 0.0)
    }
}

/// Compute the world-space pole target for a chain.
///
/// Starts from the along-chain interpolation between `first` and `tip`,
/// then offsets laterally (mirrored by `is_right`) and along the body
/// forward axis, each scaled by `chain_len`.
#[must_use]
pub fn pole_position(
    spec: &PoleSpec,
    first: &Vector3<f32>,
    tip: &Vector3<f32>,
    chain_len: f32,
    skeleton: &Skeleton,
    is_right: bool,
) -> Vector3<f32> {
    let base = first + (tip - first) * spec.along;
    let side = if is_right {
        skeleton.body_right()
    } else {
        -skeleton.body_right()
    };
    base + side * (spec.lateral * chain_len) + skeleton.body_forward() * (spec.axial * chain_len)
}

/// Bend-plane normal used as the up reference during orientation
/// assignment. Left and right chains use opposite point orderings so the
/// normal's handedness stays consistent across mirrored limbs.
#[must_use]
pub fn bend_plane_normal(
    first: &Vector3<f32>,
    pole: &Vector3<f32>,
    tip: &Vector3<f32>,
    is_right: bool,
) -> Option<Unit<Vector3<f32>>> {
    if is_right {
        plane_normal(first, pole, tip)
    } else {
        plane_normal(tip, pole, first)
    }
}

/// Rotation axis for the analytic two-bone solve. Winding is fixed
/// (independent of side) so that rotating the root-to-target direction by
/// a negative angle about it always swings the mid joint toward the pole.
#[must_use]
pub fn two_bone_axis(
    first: &Vector3<f32>,
    pole: &Vector3<f32>,
    target: &Vector3<f32>,
) -> Option<Unit<Vector3<f32>>> {
    plane_normal(first, pole, target)
}

// ---------------------------------------------------------------------------
// Orientation assignment
// ---------------------------------------------------------------------------

/// Write solved positions and derived orientations for every movable node
/// of `chain` back to the skeleton.
///
/// Node forward aims at the successor's solved position (the tip keeps the
/// last segment's direction toward the virtual effector); the up vector
/// comes from the chain's [`UpSource`]. Each joint's final rotation is
/// produced by its reference basis, so differently authored joints all end
/// up with the same world-space behavior.
pub fn apply_orientations(
    chain: &IkChain,
    skeleton: &mut Skeleton,
    up_normal: &Unit<Vector3<f32>>,
    virtual_tip: &Vector3<f32>,
) {
    let joints = chain.joint_indices();
    let positions = chain.positions();
    let n = positions.len();
    let start = chain.start_index();

    // Reference ups, read before any write so they reflect the pre-solve
    // pose.
    let root_joint = joints[0];
    let tip_joint = joints[n - 1];
    let root_up = skeleton.world_rotation(root_joint) * skeleton.joint(root_joint).basis.up;
    let tip_up = skeleton.world_rotation(tip_joint) * skeleton.joint(tip_joint).basis.up;

    for i in start..n {
        let forward = if i < n - 1 {
            dir_to(&positions[i], &positions[i + 1])
        } else {
            dir_to(&positions[n - 2], virtual_tip)
        };
        let Some(forward) = forward else {
            continue;
        };

        let up = match chain.spec().up_source {
            UpSource::BendNormal => up_normal.into_inner(),
            UpSource::RootUp => root_up,
            UpSource::RootTipBlend => {
                #[allow(clippy::cast_precision_loss)]
                let fraction = i as f32 / (n - 1) as f32;
                let root_rot = math::look_rotation(&forward, &root_up);
                let tip_rot = math::look_rotation(&forward, &tip_up);
                rotate_towards(&root_rot, &tip_rot, fraction) * math::UP
            }
        };

        let joint = joints[i];
        let rotation = skeleton.joint(joint).basis.orientation_for(&forward, &up);
        skeleton.set_world_position(joint, positions[i]);
        skeleton.set_world_rotation(joint, rotation);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skink_test_utils::quadruped_skeleton;

    use crate::chain::ChainKind;

    #[test]
    fn pole_spec_constructors() {
        let p = PoleSpec::new(0.4, 0.6, -0.6);
        assert_relative_eq!(p.along, 0.4);
        let q = PoleSpec::along_only(0.5);
        assert_relative_eq!(q.lateral, 0.0);
        assert_relative_eq!(q.axial, 0.0);
    }

    #[test]
    fn pole_position_along_only_sits_on_chain() {
        let skeleton = quadruped_skeleton();
        let first = Vector3::new(0.0, 0.0, 0.0);
        let tip = Vector3::new(0.0, 0.0, 1.0);
        let spec = PoleSpec::along_only(0.5);
        let pole = pole_position(&spec, &first, &tip, 1.0, &skeleton, false);
        assert_relative_eq!(pole, Vector3::new(0.0, 0.0, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn pole_position_mirrors_lateral_offset() {
        let skeleton = quadruped_skeleton(); // identity body transform
        let first = Vector3::zeros();
        let tip = Vector3::new(0.0, -1.0, 0.0);
        let spec = PoleSpec::new(0.5, 0.8, 0.0);

        let left = pole_position(&spec, &first, &tip, 1.0, &skeleton, false);
        let right = pole_position(&spec, &first, &tip, 1.0, &skeleton, true);

        // Body right is +X at identity: left chains offset to -X.
        assert!(left.x < -0.5);
        assert!(right.x > 0.5);
        assert_relative_eq!(left.x, -right.x, epsilon = 1e-6);
    }

    #[test]
    fn pole_position_axial_uses_body_forward() {
        let skeleton = quadruped_skeleton();
        let first = Vector3::zeros();
        let tip = Vector3::new(0.0, -1.0, 0.0);
        let spec = PoleSpec::new(0.0, 0.0, -0.6);
        let pole = pole_position(&spec, &first, &tip, 1.0, &skeleton, false);
        // Negative axial offset points along body back (-Z at identity).
        assert_relative_eq!(pole, Vector3::new(0.0, 0.0, -0.6), epsilon = 1e-6);
    }

    #[test]
    fn bend_normal_orderings_are_opposite() {
        let first = Vector3::zeros();
        let pole = Vector3::new(0.0, 1.0, 0.5);
        let tip = Vector3::new(0.0, 0.0, 1.0);
        let right = bend_plane_normal(&first, &pole, &tip, true).unwrap();
        let left = bend_plane_normal(&first, &pole, &tip, false).unwrap();
        assert_relative_eq!(
            right.into_inner(),
            -left.into_inner(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn bend_normal_is_orthogonal_to_plane_legs() {
        let first = Vector3::zeros();
        let pole = Vector3::new(0.3, 0.2, 0.5);
        let tip = Vector3::new(0.0, -1.0, 0.2);
        let n = bend_plane_normal(&first, &pole, &tip, true).unwrap();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.dot(&(pole - first)), 0.0, epsilon = 1e-6);
        assert_relative_eq!(n.dot(&(tip - first)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn collinear_points_give_no_normal() {
        let first = Vector3::zeros();
        let pole = Vector3::new(0.0, 0.0, 0.5);
        let tip = Vector3::new(0.0, 0.0, 1.0);
        assert!(bend_plane_normal(&first, &pole, &tip, true).is_none());
        assert!(two_bone_axis(&first, &pole, &tip).is_none());
    }

    #[test]
    fn apply_orientations_aims_basis_forward_along_segments() {
        let mut skeleton = quadruped_skeleton();
        let mut chain = IkChain::build(ChainKind::Spine, &skeleton).unwrap();

        let rest = chain.rest_effector_world(&skeleton);
        chain.set_target(rest + Vector3::new(0.04, 0.0, -0.02));
        chain.solve_and_apply(&mut skeleton);

        // For every movable non-tip node, the joint's treat-as-forward axis
        // must point at the next node.
        let joints = chain.joint_indices();
        for i in chain.start_index()..chain.len() - 1 {
            let a = skeleton.world_position(joints[i]);
            let b = skeleton.world_position(joints[i + 1]);
            let segment = (b - a).normalize();
            let basis_fw = skeleton.joint(joints[i]).basis.forward;
            let world_fw = skeleton.world_rotation(joints[i]) * basis_fw;
            assert_relative_eq!(world_fw, segment, epsilon = 1e-4);
        }
    }
}
