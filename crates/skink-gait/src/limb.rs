//! Limb identities and mirrored pairs.

use std::fmt;

use skink_ik::ChainKind;

/// The four stepping limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimbId {
    ArmLeft,
    ArmRight,
    LegLeft,
    LegRight,
}

impl LimbId {
    /// All limbs in update order.
    pub const ALL: [Self; 4] = [Self::ArmLeft, Self::ArmRight, Self::LegLeft, Self::LegRight];

    /// The mirrored partner used for step mutual exclusion. Cross-pair
    /// overlap (an arm and a leg stepping together) is unrestricted.
    #[must_use]
    pub const fn mirror(&self) -> Self {
        match self {
            Self::ArmLeft => Self::ArmRight,
            Self::ArmRight => Self::ArmLeft,
            Self::LegLeft => Self::LegRight,
            Self::LegRight => Self::LegLeft,
        }
    }

    /// The IK chain this limb drives.
    #[must_use]
    pub const fn chain_kind(&self) -> ChainKind {
        match self {
            Self::ArmLeft => ChainKind::ArmLeft,
            Self::ArmRight => ChainKind::ArmRight,
            Self::LegLeft => ChainKind::LegLeft,
            Self::LegRight => ChainKind::LegRight,
        }
    }

    /// Stable index into per-limb arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::ArmLeft => 0,
            Self::ArmRight => 1,
            Self::LegLeft => 2,
            Self::LegRight => 3,
        }
    }
}

impl fmt::Display for LimbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArmLeft => write!(f, "arm_l"),
            Self::ArmRight => write!(f, "arm_r"),
            Self::LegLeft => write!(f, "leg_l"),
            Self::LegRight => write!(f, "leg_r"),
        }
    }
}
