//! Role-to-authored-joint mapping and skeleton resolution.

use std::collections::HashMap;

use skink_core::error::RigError;

use crate::basis::JointBasis;
use crate::roles::{JointRole, MAX_TAIL_SEGMENTS};
use crate::skeleton::{Skeleton, SkeletonAsset};

/// One mapped role: the authored joint name plus its reference basis.
#[derive(Debug, Clone)]
pub struct RigEntry {
    pub name: String,
    pub basis: JointBasis,
}

/// Static mapping `JointRole -> (authored name, reference basis)`.
///
/// Built once per character kind; [`resolve`](Self::resolve) turns it plus
/// a [`SkeletonAsset`] into a [`Skeleton`]. Missing required roles are
/// fatal: no partial character may run.
#[derive(Debug, Clone, Default)]
pub struct RigConfig {
    entries: HashMap<JointRole, RigEntry>,
}

impl RigConfig {
    /// Empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a role to an authored joint name with its basis.
    pub fn map(&mut self, role: JointRole, name: &str, basis: JointBasis) -> &mut Self {
        self.entries.insert(
            role,
            RigEntry {
                name: name.to_owned(),
                basis,
            },
        );
        self
    }

    /// Entry for a role, if mapped.
    #[must_use]
    pub fn entry(&self, role: JointRole) -> Option<&RigEntry> {
        self.entries.get(&role)
    }

    /// The default quadruped mapping, carrying the authored joint names of
    /// the reference model.
    #[must_use]
    pub fn quadruped() -> Self {
        let mut cfg = Self::new();
        cfg.map(JointRole::Root, "skeleton", JointBasis::FW_UP)
            .map(JointRole::Hip, "Root_M", JointBasis::LT_DN)
            .map(JointRole::Spine, "Spine1_M", JointBasis::LT_DN)
            .map(JointRole::Chest, "Chest_M", JointBasis::LT_DN)
            .map(JointRole::Neck, "Neck_M", JointBasis::LT_DN)
            .map(JointRole::Head, "Head_M", JointBasis::LT_DN)
            .map(JointRole::EyeLeft, "Eye_L", JointBasis::LT_DN)
            .map(JointRole::EyeRight, "Eye_R", JointBasis::LT_DN)
            .map(JointRole::ScapulaLeft, "Scapula_L", JointBasis::RT_BK)
            .map(JointRole::ShoulderLeft, "Shoulder_L", JointBasis::RT_BK)
            .map(JointRole::UpperArmLeft, "Elbow_L", JointBasis::RT_BK)
            .map(JointRole::LowerArmLeft, "Wrist_L", JointBasis::DN_LT)
            .map(JointRole::ScapulaRight, "Scapula_R", JointBasis::LT_FW)
            .map(JointRole::ShoulderRight, "Shoulder_R", JointBasis::LT_FW)
            .map(JointRole::UpperArmRight, "Elbow_R", JointBasis::LT_FW)
            .map(JointRole::LowerArmRight, "Wrist_R", JointBasis::UP_RT)
            .map(JointRole::HipLeft, "Hip_L", JointBasis::RT_FW)
            .map(JointRole::UpperLegLeft, "Knee_L", JointBasis::RT_FW)
            .map(JointRole::LowerLegLeft, "Ankle_L", JointBasis::DN_LT)
            .map(JointRole::HipRight, "Hip_R", JointBasis::LT_BK)
            .map(JointRole::UpperLegRight, "Knee_R", JointBasis::LT_BK)
            .map(JointRole::LowerLegRight, "Ankle_R", JointBasis::UP_RT);
        for seg in 1..=MAX_TAIL_SEGMENTS {
            let name = format!("Tail{}_M", seg - 1);
            cfg.map(JointRole::Tail(seg), &name, JointBasis::LT_DN);
        }
        cfg
    }

    /// Resolve a raw [`SkeletonAsset`] into a [`Skeleton`].
    ///
    /// # Errors
    ///
    /// - [`RigError::MissingJoint`] when any required role has no authored
    ///   counterpart in the asset.
    /// - [`RigError::UnknownParent`] when a joint names a parent that does
    ///   not exist.
    /// - [`RigError::EmptySkeleton`] for an asset with no joints.
    pub fn resolve(&self, asset: &SkeletonAsset) -> Result<Skeleton, RigError> {
        if asset.joints.is_empty() {
            return Err(RigError::EmptySkeleton);
        }

        let index_by_name: HashMap<&str, usize> = asset
            .joints
            .iter()
            .enumerate()
            .map(|(i, j)| (j.name.as_str(), i))
            .collect();

        // Every required role must resolve to an authored joint.
        for role in JointRole::required() {
            let entry = self.entries.get(&role).ok_or_else(|| RigError::MissingJoint {
                role: role.to_string(),
            })?;
            if !index_by_name.contains_key(entry.name.as_str()) {
                return Err(RigError::MissingJoint {
                    role: role.to_string(),
                });
            }
        }

        let role_by_name: HashMap<&str, (JointRole, JointBasis)> = self
            .entries
            .iter()
            .map(|(role, entry)| (entry.name.as_str(), (*role, entry.basis)))
            .collect();

        let mut joints = Vec::with_capacity(asset.joints.len());
        for authored in &asset.joints {
            let parent = match &authored.parent {
                Some(name) => Some(*index_by_name.get(name.as_str()).ok_or_else(|| {
                    RigError::UnknownParent {
                        child: authored.name.clone(),
                        parent: name.clone(),
                    }
                })?),
                None => None,
            };
            let (role, basis) = role_by_name
                .get(authored.name.as_str())
                .map_or((None, JointBasis::default()), |(role, basis)| {
                    (Some(*role), *basis)
                });
            joints.push((authored.name.clone(), parent, basis, role, authored.local));
        }

        Skeleton::from_joints(joints)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
