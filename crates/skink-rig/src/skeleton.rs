//! Resolved skeleton with world-space pose evaluation.
//!
//! The [`SkeletonAsset`] is the shape an external loader hands over: named
//! joints, parent names, rest local transforms. Resolution (see
//! [`RigConfig`](crate::config::RigConfig)) turns it into a [`Skeleton`]
//! with parent indices, role lookup, and cached world isometries.

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use skink_core::error::RigError;
use skink_core::math;

use crate::basis::JointBasis;
use crate::roles::JointRole;

// ---------------------------------------------------------------------------
// SkeletonAsset
// ---------------------------------------------------------------------------

/// A single joint as authored in the source asset.
#[derive(Debug, Clone)]
pub struct AuthoredJoint {
    /// Authored joint name (e.g. `Knee_L`).
    pub name: String,
    /// Authored parent name; `None` for a skeleton root.
    pub parent: Option<String>,
    /// Rest transform relative to the parent.
    pub local: Isometry3<f32>,
}

/// Raw skeleton as produced by the asset loader (external collaborator).
#[derive(Debug, Clone, Default)]
pub struct SkeletonAsset {
    pub joints: Vec<AuthoredJoint>,
}

impl SkeletonAsset {
    /// Append a joint with a translation-only rest transform.
    pub fn push(&mut self, name: &str, parent: Option<&str>, offset: Vector3<f32>) -> &mut Self {
        self.joints.push(AuthoredJoint {
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            local: Isometry3::from_parts(Translation3::from(offset), UnitQuaternion::identity()),
        });
        self
    }

    /// Look up a joint index by authored name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }
}

// ---------------------------------------------------------------------------
// Skeleton
// ---------------------------------------------------------------------------

/// A resolved joint: authored data plus role, basis, and pose state.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub role: Option<JointRole>,
    pub parent: Option<usize>,
    pub basis: JointBasis,
    local: Isometry3<f32>,
    rest_local: Isometry3<f32>,
    world: Isometry3<f32>,
}

/// Resolved skeleton: joint tree, role lookup, body transform, and cached
/// world poses. Owned exclusively by the character instance; chains hold
/// plain indices into it.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    by_role: HashMap<JointRole, usize>,
    /// Character body transform, applied above every skeleton root.
    body: Isometry3<f32>,
}

impl Skeleton {
    /// Build a skeleton from resolved joints. Internal to the rig crate;
    /// use [`RigConfig::resolve`](crate::config::RigConfig::resolve).
    #[allow(clippy::type_complexity)]
    pub(crate) fn from_joints(
        joints: Vec<(String, Option<usize>, JointBasis, Option<JointRole>, Isometry3<f32>)>,
    ) -> Result<Self, RigError> {
        if joints.is_empty() {
            return Err(RigError::EmptySkeleton);
        }

        let mut children = vec![Vec::new(); joints.len()];
        let mut roots = Vec::new();
        for (i, (_, parent, _, _, _)) in joints.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        let mut by_role = HashMap::new();
        let joints: Vec<Joint> = joints
            .into_iter()
            .enumerate()
            .map(|(i, (name, parent, basis, role, local))| {
                if let Some(role) = role {
                    by_role.insert(role, i);
                }
                Joint {
                    name,
                    role,
                    parent,
                    basis,
                    local,
                    rest_local: local,
                    world: Isometry3::identity(),
                }
            })
            .collect();

        let mut skeleton = Self {
            joints,
            children,
            roots,
            by_role,
            body: Isometry3::identity(),
        };
        skeleton.refresh_world();
        Ok(skeleton)
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the skeleton has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint index for a role, if mapped.
    #[must_use]
    pub fn index_of(&self, role: JointRole) -> Option<usize> {
        self.by_role.get(&role).copied()
    }

    /// Joint metadata by index.
    #[must_use]
    pub fn joint(&self, index: usize) -> &Joint {
        &self.joints[index]
    }

    /// Parent index of a joint.
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.joints[index].parent
    }

    // -- body transform --

    /// Character body position.
    #[must_use]
    pub fn body_position(&self) -> Vector3<f32> {
        self.body.translation.vector
    }

    /// Character body rotation.
    #[must_use]
    pub fn body_rotation(&self) -> UnitQuaternion<f32> {
        self.body.rotation
    }

    /// Body-space forward in world coordinates.
    #[must_use]
    pub fn body_forward(&self) -> Vector3<f32> {
        self.body.rotation * math::FORWARD
    }

    /// Body-space back in world coordinates.
    #[must_use]
    pub fn body_back(&self) -> Vector3<f32> {
        self.body.rotation * math::BACK
    }

    /// Body-space right in world coordinates.
    #[must_use]
    pub fn body_right(&self) -> Vector3<f32> {
        self.body.rotation * math::RIGHT
    }

    /// Replace the body rotation and refresh world poses.
    pub fn set_body_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.body.rotation = rotation;
        self.refresh_world();
    }

    /// Replace the body position and refresh world poses.
    pub fn set_body_position(&mut self, position: Vector3<f32>) {
        self.body.translation = Translation3::from(position);
        self.refresh_world();
    }

    // -- joint poses --

    /// World position of a joint.
    #[must_use]
    pub fn world_position(&self, index: usize) -> Vector3<f32> {
        self.joints[index].world.translation.vector
    }

    /// World rotation of a joint.
    #[must_use]
    pub fn world_rotation(&self, index: usize) -> UnitQuaternion<f32> {
        self.joints[index].world.rotation
    }

    /// Full world isometry of a joint.
    #[must_use]
    pub fn world_isometry(&self, index: usize) -> Isometry3<f32> {
        self.joints[index].world
    }

    /// Set a joint's world rotation, updating its local rotation and the
    /// cached world poses of its subtree.
    pub fn set_world_rotation(&mut self, index: usize, rotation: UnitQuaternion<f32>) {
        let parent_world_rot = match self.joints[index].parent {
            Some(p) => self.joints[p].world.rotation,
            None => self.body.rotation,
        };
        self.joints[index].local.rotation = parent_world_rot.inverse() * rotation;
        self.refresh_subtree(index);
    }

    /// Set a joint's world position, updating its local translation and the
    /// cached world poses of its subtree.
    pub fn set_world_position(&mut self, index: usize, position: Vector3<f32>) {
        let parent_world = match self.joints[index].parent {
            Some(p) => self.joints[p].world,
            None => self.body,
        };
        self.joints[index].local.translation =
            Translation3::from(parent_world.inverse_transform_point(&position.into()).coords);
        self.refresh_subtree(index);
    }

    /// Map a world-space point into body space.
    #[must_use]
    pub fn world_to_body(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.body.inverse_transform_point(&(*point).into()).coords
    }

    /// Map a body-space point into world space.
    #[must_use]
    pub fn body_to_world(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.body.transform_point(&(*point).into()).coords
    }

    /// Restore every joint to its rest local pose (body transform kept).
    pub fn reset_to_rest(&mut self) {
        for joint in &mut self.joints {
            joint.local = joint.rest_local;
        }
        self.refresh_world();
    }

    /// Recompute every cached world isometry from the body transform down.
    pub fn refresh_world(&mut self) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.refresh_subtree(root);
        }
    }

    fn refresh_subtree(&mut self, index: usize) {
        let parent_world = match self.joints[index].parent {
            Some(p) => self.joints[p].world,
            None => self.body,
        };
        self.joints[index].world = parent_world * self.joints[index].local;
        for c in 0..self.children[index].len() {
            let child = self.children[index][c];
            self.refresh_subtree(child);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
