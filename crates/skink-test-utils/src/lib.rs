//! Synthetic quadruped rigs for tests and headless demos.
//!
//! The asset builders author a small lizard-proportioned skeleton with the
//! joint names the default [`RigConfig::quadruped`] mapping expects:
//! spine running along +Z, limbs hanging straight down, tail along -Z.

use nalgebra::Vector3;

use skink_rig::{JointBasis, JointRole, RigConfig, Skeleton, SkeletonAsset};

/// Number of tail segments the default test asset authors.
pub const DEFAULT_TAIL_SEGMENTS: u8 = 8;

/// Author a quadruped skeleton asset with `tail_segments` tail joints.
#[must_use]
pub fn quadruped_asset_with_tail(tail_segments: u8) -> SkeletonAsset {
    let mut asset = SkeletonAsset::default();
    asset.push("skeleton", None, Vector3::zeros());
    asset.push("Root_M", Some("skeleton"), Vector3::new(0.0, 0.2, -0.1));
    asset.push("Spine1_M", Some("Root_M"), Vector3::new(0.0, 0.0, 0.1));
    asset.push("Chest_M", Some("Spine1_M"), Vector3::new(0.0, 0.0, 0.1));
    asset.push("Neck_M", Some("Chest_M"), Vector3::new(0.0, 0.0, 0.05));
    asset.push("Head_M", Some("Neck_M"), Vector3::new(0.0, 0.0, 0.05));
    asset.push("Eye_L", Some("Head_M"), Vector3::new(-0.02, 0.01, 0.03));
    asset.push("Eye_R", Some("Head_M"), Vector3::new(0.02, 0.01, 0.03));

    for side in ["L", "R"] {
        let sign = if side == "L" { -1.0 } else { 1.0 };
        asset.push(
            &format!("Scapula_{side}"),
            Some("Chest_M"),
            Vector3::new(sign * 0.05, 0.0, 0.02),
        );
        asset.push(
            &format!("Shoulder_{side}"),
            Some(&format!("Scapula_{side}")),
            Vector3::new(sign * 0.03, 0.0, 0.0),
        );
        asset.push(
            &format!("Elbow_{side}"),
            Some(&format!("Shoulder_{side}")),
            Vector3::new(0.0, -0.08, 0.0),
        );
        asset.push(
            &format!("Wrist_{side}"),
            Some(&format!("Elbow_{side}")),
            Vector3::new(0.0, -0.08, 0.0),
        );
        asset.push(
            &format!("Hip_{side}"),
            Some("Root_M"),
            Vector3::new(sign * 0.06, 0.0, 0.0),
        );
        asset.push(
            &format!("Knee_{side}"),
            Some(&format!("Hip_{side}")),
            Vector3::new(0.0, -0.08, 0.0),
        );
        asset.push(
            &format!("Ankle_{side}"),
            Some(&format!("Knee_{side}")),
            Vector3::new(0.0, -0.08, 0.0),
        );
    }

    for seg in 0..tail_segments {
        let name = format!("Tail{seg}_M");
        let parent = if seg == 0 {
            "Root_M".to_owned()
        } else {
            format!("Tail{}_M", seg - 1)
        };
        asset.push(&name, Some(&parent), Vector3::new(0.0, 0.0, -0.06));
    }

    asset
}

/// Author the default quadruped asset (eight tail segments).
#[must_use]
pub fn quadruped_asset() -> SkeletonAsset {
    quadruped_asset_with_tail(DEFAULT_TAIL_SEGMENTS)
}

/// Rig mapping whose reference bases match the synthetic asset's
/// authoring.
///
/// The test asset authors every joint with an identity rotation, so each
/// joint's treat-as-forward axis is simply the direction to its chain
/// child: +Z along the spine, straight down along the limbs, -Z along the
/// tail. (The production [`RigConfig::quadruped`] bases describe the real
/// model's axes instead.)
#[must_use]
pub fn test_rig_config() -> RigConfig {
    use skink_core::math::{BACK, DOWN, FORWARD, LEFT, RIGHT, UP};

    let fw_up = JointBasis::FW_UP;
    let down = JointBasis::new(DOWN, FORWARD);
    let back = JointBasis::new(BACK, UP);

    let mut cfg = RigConfig::new();
    cfg.map(JointRole::Root, "skeleton", fw_up)
        .map(JointRole::Hip, "Root_M", fw_up)
        .map(JointRole::Spine, "Spine1_M", fw_up)
        .map(JointRole::Chest, "Chest_M", fw_up)
        .map(JointRole::Neck, "Neck_M", fw_up)
        .map(JointRole::Head, "Head_M", fw_up)
        .map(JointRole::EyeLeft, "Eye_L", fw_up)
        .map(JointRole::EyeRight, "Eye_R", fw_up)
        .map(JointRole::ScapulaLeft, "Scapula_L", JointBasis::new(LEFT, UP))
        .map(JointRole::ShoulderLeft, "Shoulder_L", down)
        .map(JointRole::UpperArmLeft, "Elbow_L", down)
        .map(JointRole::LowerArmLeft, "Wrist_L", down)
        .map(JointRole::ScapulaRight, "Scapula_R", JointBasis::new(RIGHT, UP))
        .map(JointRole::ShoulderRight, "Shoulder_R", down)
        .map(JointRole::UpperArmRight, "Elbow_R", down)
        .map(JointRole::LowerArmRight, "Wrist_R", down)
        .map(JointRole::HipLeft, "Hip_L", down)
        .map(JointRole::UpperLegLeft, "Knee_L", down)
        .map(JointRole::LowerLegLeft, "Ankle_L", down)
        .map(JointRole::HipRight, "Hip_R", down)
        .map(JointRole::UpperLegRight, "Knee_R", down)
        .map(JointRole::LowerLegRight, "Ankle_R", down);
    for seg in 1..=16u8 {
        let name = format!("Tail{}_M", seg - 1);
        cfg.map(JointRole::Tail(seg), &name, back);
    }
    cfg
}

/// Resolve the default quadruped asset into a [`Skeleton`].
///
/// # Panics
///
/// Panics if the mapping fails to resolve the default asset, which would
/// be a bug in either.
#[must_use]
pub fn quadruped_skeleton() -> Skeleton {
    test_rig_config()
        .resolve(&quadruped_asset())
        .expect("default quadruped asset must resolve")
}

/// Resolve a quadruped with a custom tail segment count (minimum 2 for the
/// rig mapping's required roles).
#[must_use]
pub fn quadruped_skeleton_with_tail(tail_segments: u8) -> Skeleton {
    test_rig_config()
        .resolve(&quadruped_asset_with_tail(tail_segments))
        .expect("quadruped asset must resolve")
}
