//! Chain specifications and built IK chains.
//!
//! Chain kinds are a closed set; [`ChainSpec::for_kind`] is the single
//! configuration table mapping each kind to its node roles, solver
//! parameters, and pole offsets. Specs may be tuned before a chain is
//! built; a built [`IkChain`]'s topology and tuning are immutable.

use std::fmt;

use nalgebra::{Unit, Vector3};

use skink_core::error::RigError;
use skink_core::math::dir_to;
use skink_rig::{JointRole, Skeleton};

use crate::pole::{self, PoleSpec};
use crate::solver;

// ---------------------------------------------------------------------------
// ChainKind
// ---------------------------------------------------------------------------

/// The chains a character is rigged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    Spine,
    ArmLeft,
    ArmRight,
    LegLeft,
    LegRight,
    Tail,
}

impl ChainKind {
    /// Every chain kind, in solve order (spine and tail first).
    pub const ALL: [Self; 6] = [
        Self::Spine,
        Self::Tail,
        Self::ArmLeft,
        Self::ArmRight,
        Self::LegLeft,
        Self::LegRight,
    ];

    /// Whether this chain drives a stepping limb.
    #[must_use]
    pub const fn is_limb(&self) -> bool {
        matches!(
            self,
            Self::ArmLeft | Self::ArmRight | Self::LegLeft | Self::LegRight
        )
    }

    /// The mirrored partner of a limb chain.
    #[must_use]
    pub const fn mirror(&self) -> Option<Self> {
        match self {
            Self::ArmLeft => Some(Self::ArmRight),
            Self::ArmRight => Some(Self::ArmLeft),
            Self::LegLeft => Some(Self::LegRight),
            Self::LegRight => Some(Self::LegLeft),
            Self::Spine | Self::Tail => None,
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spine => write!(f, "spine"),
            Self::ArmLeft => write!(f, "arm_l"),
            Self::ArmRight => write!(f, "arm_r"),
            Self::LegLeft => write!(f, "leg_l"),
            Self::LegRight => write!(f, "leg_r"),
            Self::Tail => write!(f, "tail"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChainSpec
// ---------------------------------------------------------------------------

/// Solver tuning for one chain. Adjustable only before the chain is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTuning {
    /// Iteration budget for the general iterative solver.
    pub iterations: u32,
    /// Relax toward the rest pose each frame instead of fully tracking the
    /// target (springy spine/tail behavior).
    pub stick_to_initial: bool,
    /// Blend factor toward the rest tip when `stick_to_initial` is set.
    pub stickiness: f32,
    /// Extend the effective tip beyond the last joint by this fraction of
    /// the last bone length (hand/foot target means fingertip/toe).
    pub extend_tip_by: f32,
    /// Permit the analytic two-bone solve when the chain has exactly two
    /// movable bones.
    pub allow_two_bone: bool,
}

impl Default for ChainTuning {
    fn default() -> Self {
        Self {
            iterations: 16,
            stick_to_initial: false,
            stickiness: 0.5,
            extend_tip_by: 0.0,
            allow_two_bone: false,
        }
    }
}

/// How per-node up vectors are derived during orientation assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpSource {
    /// Every node takes the bend-plane normal (limbs).
    BendNormal,
    /// Every node takes the root joint's reference up (tail).
    RootUp,
    /// Nodes blend from the root joint's up to the tip joint's up along the
    /// chain (spine), stabilizing twist over long chains.
    RootTipBlend,
}

/// Static description of one chain: node roles plus solver parameters.
#[derive(Debug, Clone)]
pub struct ChainSpec {
    pub kind: ChainKind,
    pub roles: Vec<JointRole>,
    /// First node actually moved by the solver; earlier nodes are rigid
    /// anchors.
    pub start_index: usize,
    /// Mirrors lateral pole offsets for bilateral symmetry.
    pub is_right: bool,
    pub tuning: ChainTuning,
    pub pole: PoleSpec,
    pub up_source: UpSource,
}

impl ChainSpec {
    /// The configuration table: chain kind to node roles, solver
    /// parameters, and pole offsets.
    #[must_use]
    pub fn for_kind(kind: ChainKind) -> Self {
        use JointRole as R;
        match kind {
            ChainKind::Spine => Self {
                kind,
                roles: vec![R::Hip, R::Spine, R::Chest, R::Neck],
                start_index: 1,
                is_right: false,
                tuning: ChainTuning {
                    stick_to_initial: true,
                    ..ChainTuning::default()
                },
                pole: PoleSpec::along_only(0.5),
                up_source: UpSource::RootTipBlend,
            },
            ChainKind::ArmLeft | ChainKind::ArmRight => {
                let right = kind == ChainKind::ArmRight;
                let (scapula, shoulder, upper, lower) = if right {
                    (R::ScapulaRight, R::ShoulderRight, R::UpperArmRight, R::LowerArmRight)
                } else {
                    (R::ScapulaLeft, R::ShoulderLeft, R::UpperArmLeft, R::LowerArmLeft)
                };
                Self {
                    kind,
                    roles: vec![R::Chest, scapula, shoulder, upper, lower],
                    start_index: 2,
                    is_right: right,
                    tuning: ChainTuning {
                        extend_tip_by: 0.6,
                        allow_two_bone: true,
                        ..ChainTuning::default()
                    },
                    pole: PoleSpec::new(0.4, 0.6, -0.6),
                    up_source: UpSource::BendNormal,
                }
            }
            ChainKind::LegLeft | ChainKind::LegRight => {
                let right = kind == ChainKind::LegRight;
                let (hip_side, upper, lower) = if right {
                    (R::HipRight, R::UpperLegRight, R::LowerLegRight)
                } else {
                    (R::HipLeft, R::UpperLegLeft, R::LowerLegLeft)
                };
                Self {
                    kind,
                    roles: vec![R::Hip, hip_side, upper, lower],
                    start_index: 1,
                    is_right: right,
                    tuning: ChainTuning {
                        extend_tip_by: 0.6,
                        allow_two_bone: true,
                        ..ChainTuning::default()
                    },
                    pole: PoleSpec::new(0.2, 0.8, 0.5),
                    up_source: UpSource::BendNormal,
                }
            }
            ChainKind::Tail => {
                let mut roles = vec![R::Hip];
                roles.extend((1..=skink_rig::roles::MAX_TAIL_SEGMENTS).map(R::Tail));
                Self {
                    kind,
                    roles,
                    start_index: 1,
                    is_right: false,
                    tuning: ChainTuning {
                        stick_to_initial: true,
                        ..ChainTuning::default()
                    },
                    pole: PoleSpec::along_only(0.5),
                    up_source: UpSource::RootUp,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// IkChain
// ---------------------------------------------------------------------------

/// A built chain: skeleton joint indices root to tip, fixed bone lengths,
/// rest state, and a mutable world-space target.
///
/// Working world positions are cached per solve and not persisted between
/// frames; the skeleton remains the source of truth.
#[derive(Debug, Clone)]
pub struct IkChain {
    spec: ChainSpec,
    joints: Vec<usize>,
    positions: Vec<Vector3<f32>>,
    lengths: Vec<f32>,
    total_length: f32,
    /// Rest effector (tip including extension) in body space.
    rest_effector_body: Vector3<f32>,
    target: Vector3<f32>,
}

impl IkChain {
    /// Build the chain for `kind` from the table spec.
    ///
    /// # Errors
    ///
    /// [`RigError::ChainTooShort`] when the resolved movable span has fewer
    /// than two nodes (roles absent from the skeleton are skipped for the
    /// tail, required elsewhere).
    pub fn build(kind: ChainKind, skeleton: &Skeleton) -> Result<Self, RigError> {
        Self::build_with_spec(ChainSpec::for_kind(kind), skeleton)
    }

    /// Build from an explicit (possibly tuned) spec.
    pub fn build_with_spec(spec: ChainSpec, skeleton: &Skeleton) -> Result<Self, RigError> {
        let joints: Vec<usize> = spec
            .roles
            .iter()
            .filter_map(|role| skeleton.index_of(*role))
            .collect();

        if joints.len() < spec.start_index + 2 {
            return Err(RigError::ChainTooShort {
                kind: spec.kind.to_string(),
                nodes: joints.len(),
                min: spec.start_index + 2,
            });
        }

        let positions: Vec<Vector3<f32>> = joints
            .iter()
            .map(|&j| skeleton.world_position(j))
            .collect();
        let lengths: Vec<f32> = positions
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .collect();
        let total_length = lengths.iter().sum();

        let n = positions.len();
        let tip_dir = dir_to(&positions[n - 2], &positions[n - 1]);
        let extension = tip_dir.map_or_else(Vector3::zeros, |d| {
            d.as_ref() * (spec.tuning.extend_tip_by * lengths[n - 2])
        });
        let rest_effector_world = positions[n - 1] + extension;
        let rest_effector_body = skeleton.world_to_body(&rest_effector_world);

        Ok(Self {
            spec,
            joints,
            positions,
            lengths,
            total_length,
            rest_effector_body,
            target: rest_effector_world,
        })
    }

    /// Chain kind.
    #[must_use]
    pub const fn kind(&self) -> ChainKind {
        self.spec.kind
    }

    /// The spec the chain was built with.
    #[must_use]
    pub const fn spec(&self) -> &ChainSpec {
        &self.spec
    }

    /// Whether this is a right-side chain.
    #[must_use]
    pub const fn is_right(&self) -> bool {
        self.spec.is_right
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the chain has no nodes (never true for a built chain).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Skeleton joint indices, root to tip.
    #[must_use]
    pub fn joint_indices(&self) -> &[usize] {
        &self.joints
    }

    /// Fixed bone lengths.
    #[must_use]
    pub fn bone_lengths(&self) -> &[f32] {
        &self.lengths
    }

    /// Total physical chain length.
    #[must_use]
    pub const fn total_length(&self) -> f32 {
        self.total_length
    }

    /// First movable node index.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.spec.start_index
    }

    /// Last solved node positions (valid after a solve).
    #[must_use]
    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    /// World position of the chain root joint.
    #[must_use]
    pub fn root_world(&self, skeleton: &Skeleton) -> Vector3<f32> {
        skeleton.world_position(self.joints[0])
    }

    /// Current effector world position (tip joint plus tip extension).
    #[must_use]
    pub fn effector_world(&self, skeleton: &Skeleton) -> Vector3<f32> {
        let n = self.joints.len();
        let tip = skeleton.world_position(self.joints[n - 1]);
        let prev = skeleton.world_position(self.joints[n - 2]);
        let extension = dir_to(&prev, &tip).map_or_else(Vector3::zeros, |d| {
            d.as_ref() * (self.spec.tuning.extend_tip_by * self.lengths[n - 2])
        });
        tip + extension
    }

    /// Rest/ideal effector position mapped through the current body
    /// transform. This is the gait controller's home position: it moves
    /// with the body as the character turns.
    #[must_use]
    pub fn rest_effector_world(&self, skeleton: &Skeleton) -> Vector3<f32> {
        skeleton.body_to_world(&self.rest_effector_body)
    }

    /// Set the world-space target for the next solve.
    pub const fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    /// Current world-space target.
    #[must_use]
    pub const fn target(&self) -> Vector3<f32> {
        self.target
    }

    /// Refresh cached node positions from the skeleton.
    pub fn refresh(&mut self, skeleton: &Skeleton) {
        for (slot, &joint) in self.positions.iter_mut().zip(self.joints.iter()) {
            *slot = skeleton.world_position(joint);
        }
    }

    /// Solve toward the current target and write positions and
    /// orientations back to the skeleton.
    pub fn solve_and_apply(&mut self, skeleton: &mut Skeleton) {
        self.refresh(skeleton);

        let n = self.positions.len();
        let start = self.spec.start_index;
        let tuning = self.spec.tuning;

        // Springy chains relax toward their rest pose instead of fully
        // tracking the target.
        let target = if tuning.stick_to_initial {
            let rest = self.rest_effector_world(skeleton);
            self.target + (rest - self.target) * tuning.stickiness
        } else {
            self.target
        };

        // The tip extension is rigid with the last bone: solve with the
        // last length scaled up, then pull the physical tip back.
        let mut solve_lengths = self.lengths.clone();
        solve_lengths[n - 2] *= 1.0 + tuning.extend_tip_by;
        if let Some(d) = dir_to(&self.positions[n - 2], &self.positions[n - 1]) {
            self.positions[n - 1] =
                self.positions[n - 2] + d.as_ref() * solve_lengths[n - 2];
        }

        let pole_pos = pole::pole_position(
            &self.spec.pole,
            &self.positions[start],
            &self.positions[n - 1],
            self.total_length,
            skeleton,
            self.spec.is_right,
        );
        // Side-ordered normal for orientation assignment; raw winding for
        // the two-bone bend axis (the mid joint always swings toward the
        // pole side).
        let up_normal =
            pole::bend_plane_normal(&self.positions[start], &pole_pos, &target, self.spec.is_right)
                .unwrap_or_else(|| Unit::new_normalize(skeleton.body_right()));
        let bend_axis = pole::two_bone_axis(&self.positions[start], &pole_pos, &target)
            .unwrap_or(up_normal);

        let movable_bones = n - 1 - start;
        if tuning.allow_two_bone && movable_bones == 2 {
            let (mid, tip) = solver::solve_two_bone(
                &self.positions[start],
                &target,
                solve_lengths[start],
                solve_lengths[start + 1],
                &bend_axis,
            );
            self.positions[start + 1] = mid;
            self.positions[start + 2] = tip;
        } else {
            solver::solve_fabrik(
                &mut self.positions,
                &solve_lengths,
                start,
                &target,
                tuning.iterations,
            );
        }

        // Pull the physical tip back from the virtual (extended) effector.
        let virtual_tip = self.positions[n - 1];
        if let Some(d) = dir_to(&self.positions[n - 2], &virtual_tip) {
            self.positions[n - 1] = self.positions[n - 2] + d.as_ref() * self.lengths[n - 2];
        }

        pole::apply_orientations(self, skeleton, &up_normal, &virtual_tip);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
