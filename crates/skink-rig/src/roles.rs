//! Symbolic joint identities, stable across skeletons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest tail segment index the default rig maps.
pub const MAX_TAIL_SEGMENTS: u8 = 16;

/// Abstract joint identity. Stable across differently authored skeletons;
/// the mapping to authored joint names lives in
/// [`RigConfig`](crate::config::RigConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointRole {
    Root,
    Hip,
    Spine,
    Chest,
    Neck,
    Head,
    EyeLeft,
    EyeRight,
    ScapulaLeft,
    ShoulderLeft,
    UpperArmLeft,
    LowerArmLeft,
    ScapulaRight,
    ShoulderRight,
    UpperArmRight,
    LowerArmRight,
    HipLeft,
    UpperLegLeft,
    LowerLegLeft,
    HipRight,
    UpperLegRight,
    LowerLegRight,
    /// Tail segment, 1-based from the hip outward.
    Tail(u8),
}

impl JointRole {
    /// Roles that must resolve for a character to be constructible.
    ///
    /// Eyes and tail segments beyond the second are optional: missing tail
    /// joints merely shorten the tail chain.
    #[must_use]
    pub fn required() -> Vec<Self> {
        vec![
            Self::Root,
            Self::Hip,
            Self::Spine,
            Self::Chest,
            Self::Neck,
            Self::Head,
            Self::ScapulaLeft,
            Self::ShoulderLeft,
            Self::UpperArmLeft,
            Self::LowerArmLeft,
            Self::ScapulaRight,
            Self::ShoulderRight,
            Self::UpperArmRight,
            Self::LowerArmRight,
            Self::HipLeft,
            Self::UpperLegLeft,
            Self::LowerLegLeft,
            Self::HipRight,
            Self::UpperLegRight,
            Self::LowerLegRight,
            Self::Tail(1),
            Self::Tail(2),
        ]
    }

    /// Whether this role belongs to the right side of a mirrored pair.
    #[must_use]
    pub const fn is_right_side(&self) -> bool {
        matches!(
            self,
            Self::EyeRight
                | Self::ScapulaRight
                | Self::ShoulderRight
                | Self::UpperArmRight
                | Self::LowerArmRight
                | Self::HipRight
                | Self::UpperLegRight
                | Self::LowerLegRight
        )
    }
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Hip => write!(f, "hip"),
            Self::Spine => write!(f, "spine"),
            Self::Chest => write!(f, "chest"),
            Self::Neck => write!(f, "neck"),
            Self::Head => write!(f, "head"),
            Self::EyeLeft => write!(f, "eye_l"),
            Self::EyeRight => write!(f, "eye_r"),
            Self::ScapulaLeft => write!(f, "scapula_l"),
            Self::ShoulderLeft => write!(f, "shoulder_l"),
            Self::UpperArmLeft => write!(f, "upper_arm_l"),
            Self::LowerArmLeft => write!(f, "lower_arm_l"),
            Self::ScapulaRight => write!(f, "scapula_r"),
            Self::ShoulderRight => write!(f, "shoulder_r"),
            Self::UpperArmRight => write!(f, "upper_arm_r"),
            Self::LowerArmRight => write!(f, "lower_arm_r"),
            Self::HipLeft => write!(f, "hip_l"),
            Self::UpperLegLeft => write!(f, "upper_leg_l"),
            Self::LowerLegLeft => write!(f, "lower_leg_l"),
            Self::HipRight => write!(f, "hip_r"),
            Self::UpperLegRight => write!(f, "upper_leg_r"),
            Self::LowerLegRight => write!(f, "lower_leg_r"),
            Self::Tail(n) => write!(f, "tail_{n:02}"),
        }
    }
}
