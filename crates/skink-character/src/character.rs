//! Character assembly and the per-frame update pipeline.

use nalgebra::Vector3;

use skink_core::error::SkinkError;
use skink_core::time::FrameClock;
use skink_gait::{GaitController, GaitEvent, GaitPhase, LimbId};
use skink_ik::{ChainKind, ChainSpec, IkChain};
use skink_rig::{RigConfig, Skeleton, SkeletonAsset};
use skink_steer::{OrientationController, SteerOutcome, TargetTracker};

use crate::config::CharacterConfig;

/// Default camera position used until the host supplies one.
const DEFAULT_CAMERA: Vector3<f32> = Vector3::new(0.0, 0.4, 1.0);

// ---------------------------------------------------------------------------
// CharacterBuilder
// ---------------------------------------------------------------------------

/// Builds a [`Character`]. Chain tuning is only possible here: once built,
/// chain topology and solver parameters are immutable.
pub struct CharacterBuilder {
    asset: SkeletonAsset,
    rig: RigConfig,
    config: CharacterConfig,
    specs: Vec<ChainSpec>,
    camera: Vector3<f32>,
}

impl CharacterBuilder {
    /// Builder over a raw skeleton asset with the default quadruped rig
    /// mapping and tuning.
    #[must_use]
    pub fn new(asset: SkeletonAsset) -> Self {
        Self {
            asset,
            rig: RigConfig::quadruped(),
            config: CharacterConfig::default(),
            specs: ChainKind::ALL.map(ChainSpec::for_kind).into(),
            camera: DEFAULT_CAMERA,
        }
    }

    /// Replace the rig mapping.
    #[must_use]
    pub fn with_rig(mut self, rig: RigConfig) -> Self {
        self.rig = rig;
        self
    }

    /// Replace the tuning config.
    #[must_use]
    pub fn with_config(mut self, config: CharacterConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial camera world position.
    #[must_use]
    pub fn with_camera(mut self, camera: Vector3<f32>) -> Self {
        self.camera = camera;
        self
    }

    /// Adjust one chain's spec before construction.
    pub fn tune_chain(&mut self, kind: ChainKind, tune: impl FnOnce(&mut ChainSpec)) -> &mut Self {
        if let Some(spec) = self.specs.iter_mut().find(|s| s.kind == kind) {
            tune(spec);
        }
        self
    }

    /// Resolve the skeleton, build every chain, and wire the controllers.
    ///
    /// # Errors
    ///
    /// Any configuration or rig error aborts construction; no partial
    /// character is ever produced.
    pub fn build(self) -> Result<Character, SkinkError> {
        self.config.validate()?;
        let skeleton = self.rig.resolve(&self.asset)?;

        let mut spine = None;
        let mut tail = None;
        let mut limbs: [Option<IkChain>; 4] = [None, None, None, None];

        for mut spec in self.specs {
            // The configured stickiness applies to the springy chains.
            if spec.tuning.stick_to_initial {
                spec.tuning.stickiness = self.config.stickiness;
            }
            let kind = spec.kind;
            let chain = IkChain::build_with_spec(spec, &skeleton)?;
            match kind {
                ChainKind::Spine => spine = Some(chain),
                ChainKind::Tail => tail = Some(chain),
                ChainKind::ArmLeft => limbs[LimbId::ArmLeft.index()] = Some(chain),
                ChainKind::ArmRight => limbs[LimbId::ArmRight.index()] = Some(chain),
                ChainKind::LegLeft => limbs[LimbId::LegLeft.index()] = Some(chain),
                ChainKind::LegRight => limbs[LimbId::LegRight.index()] = Some(chain),
            }
        }

        // Every kind is present in the spec table; a hole here is a bug.
        let spine = spine.expect("spine spec missing from chain table");
        let tail = tail.expect("tail spec missing from chain table");
        let limbs = limbs.map(|chain| chain.expect("limb spec missing from chain table"));

        let steer =
            OrientationController::new(self.config.steer(), &spine, &tail, &skeleton);
        let anchors = [
            limbs[0].rest_effector_world(&skeleton),
            limbs[1].rest_effector_world(&skeleton),
            limbs[2].rest_effector_world(&skeleton),
            limbs[3].rest_effector_world(&skeleton),
        ];
        let gait = GaitController::new(self.config.gait(), anchors);

        let start_target =
            skeleton.body_position() + skeleton.body_forward() * self.config.target_radius;
        let tracker = TargetTracker::new(self.config.target(), start_target, self.camera);

        Ok(Character {
            skeleton,
            spine,
            tail,
            limbs,
            gait,
            steer,
            tracker,
            clock: FrameClock::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A fully wired procedural character.
///
/// All state lives in memory and is rebuilt from the skeleton
/// configuration each run; nothing is persisted.
#[derive(Debug)]
pub struct Character {
    skeleton: Skeleton,
    spine: IkChain,
    tail: IkChain,
    limbs: [IkChain; 4],
    gait: GaitController,
    steer: OrientationController,
    tracker: TargetTracker,
    clock: FrameClock,
}

impl Character {
    /// Builder over a raw skeleton asset.
    #[must_use]
    pub fn builder(asset: SkeletonAsset) -> CharacterBuilder {
        CharacterBuilder::new(asset)
    }

    /// Build with all defaults.
    pub fn from_asset(asset: SkeletonAsset) -> Result<Self, SkinkError> {
        CharacterBuilder::new(asset).build()
    }

    // -- frame pipeline --

    /// Full frame update: steer, spine/tail solve, gaze, gait, limb
    /// solves, in the required order. Returns the gait transitions that
    /// fired this frame.
    pub fn update(&mut self, dt: f32) -> Vec<(LimbId, GaitEvent)> {
        self.steer_frame(dt);
        self.solve_spine_frame();
        let events = self.gait_frame();
        self.solve_limbs_frame();
        events
    }

    /// Steer stage: tick clocks and the target tracker, turn the body,
    /// refresh the spine/tail targets.
    pub fn steer_frame(&mut self, dt: f32) -> SteerOutcome {
        self.clock.tick(dt);
        self.tracker.update(dt);
        self.steer.update(
            &mut self.skeleton,
            &mut self.spine,
            &mut self.tail,
            &self.tracker.position(),
            self.clock.smooth_delta(),
        )
    }

    /// Solve stage for the springy chains, then head gaze (after the spine
    /// solve so the tip write does not clobber it).
    pub fn solve_spine_frame(&mut self) {
        self.spine.solve_and_apply(&mut self.skeleton);
        self.tail.solve_and_apply(&mut self.skeleton);
        self.steer
            .apply_gaze(&mut self.skeleton, &self.tracker.position());
    }

    /// Gait stage: per-limb grounding checks and step scheduling. Must run
    /// strictly after [`solve_spine_frame`](Self::solve_spine_frame); the
    /// rest positions it compares against already reflect the bent spine.
    pub fn gait_frame(&mut self) -> Vec<(LimbId, GaitEvent)> {
        let dt = self.clock.delta();
        let mut events = Vec::new();
        for limb in LimbId::ALL {
            let chain = &self.limbs[limb.index()];
            let current = chain.effector_world(&self.skeleton);
            let rest = chain.rest_effector_world(&self.skeleton);
            let update = self.gait.tick(limb, dt, &current, &rest);
            self.limbs[limb.index()].set_target(update.target);
            if let Some(event) = update.event {
                events.push((limb, event));
            }
        }
        events
    }

    /// Solve stage for the limb chains.
    pub fn solve_limbs_frame(&mut self) {
        for chain in &mut self.limbs {
            chain.solve_and_apply(&mut self.skeleton);
        }
    }

    // -- input passthrough --

    /// Latest camera world position.
    pub fn set_camera(&mut self, camera: Vector3<f32>) {
        self.tracker.set_camera(camera);
    }

    /// Latest world point under the input.
    pub fn set_touch_point(&mut self, touch: Vector3<f32>) {
        self.tracker.set_touch_point(touch);
    }

    /// A drag gesture began.
    pub fn begin_drag(&mut self) {
        self.tracker.begin_drag();
    }

    /// The drag gesture ended.
    pub fn end_drag(&mut self) {
        self.tracker.end_drag();
    }

    // -- queries --

    /// The resolved skeleton.
    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// A chain by kind.
    #[must_use]
    pub fn chain(&self, kind: ChainKind) -> &IkChain {
        match kind {
            ChainKind::Spine => &self.spine,
            ChainKind::Tail => &self.tail,
            ChainKind::ArmLeft => &self.limbs[LimbId::ArmLeft.index()],
            ChainKind::ArmRight => &self.limbs[LimbId::ArmRight.index()],
            ChainKind::LegLeft => &self.limbs[LimbId::LegLeft.index()],
            ChainKind::LegRight => &self.limbs[LimbId::LegRight.index()],
        }
    }

    /// Current gait phase of a limb.
    #[must_use]
    pub fn gait_phase(&self, limb: LimbId) -> GaitPhase {
        self.gait.phase(limb)
    }

    /// Whether a limb blocks its mirrored partner.
    #[must_use]
    pub fn is_blocking(&self, limb: LimbId) -> bool {
        self.gait.is_blocking(limb)
    }

    /// Current target world position.
    #[must_use]
    pub fn target_position(&self) -> Vector3<f32> {
        self.tracker.position()
    }

    /// The target tracker.
    #[must_use]
    pub const fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    /// The character frame clock.
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skink_core::error::{RigError, SkinkError};
    use skink_test_utils::{quadruped_asset, quadruped_asset_with_tail, test_rig_config};

    /// Build with the rig mapping that matches the synthetic asset's
    /// authoring.
    fn build(asset: SkeletonAsset) -> Result<Character, SkinkError> {
        Character::builder(asset).with_rig(test_rig_config()).build()
    }

    #[test]
    fn builds_from_default_asset() {
        let character = build(quadruped_asset()).unwrap();
        for limb in LimbId::ALL {
            assert_eq!(character.gait_phase(limb), GaitPhase::Grounded);
            assert!(!character.is_blocking(limb));
        }
        assert_eq!(character.chain(ChainKind::Spine).len(), 4);
    }

    #[test]
    fn short_tail_still_builds() {
        let character = build(quadruped_asset_with_tail(3)).unwrap();
        assert_eq!(character.chain(ChainKind::Tail).len(), 4);
    }

    #[test]
    fn missing_joint_aborts_construction() {
        let mut asset = quadruped_asset();
        let head = asset.index_of("Head_M").unwrap();
        asset.joints.remove(head);
        for joint in &mut asset.joints {
            if joint.parent.as_deref() == Some("Head_M") {
                joint.parent = Some("Neck_M".into());
            }
        }
        let err = build(asset).unwrap_err();
        assert!(matches!(
            err,
            SkinkError::Rig(RigError::MissingJoint { .. })
        ));
    }

    #[test]
    fn invalid_config_aborts_construction() {
        let mut config = CharacterConfig::default();
        config.turn_speed = -1.0;
        let err = Character::builder(quadruped_asset())
            .with_rig(test_rig_config())
            .with_config(config)
            .build()
            .unwrap_err();
        assert!(matches!(err, SkinkError::Config(_)));
    }

    #[test]
    fn chain_tuning_applies_pre_build() {
        let mut builder = Character::builder(quadruped_asset()).with_rig(test_rig_config());
        builder.tune_chain(ChainKind::Spine, |spec| {
            spec.tuning.iterations = 32;
        });
        let character = builder.build().unwrap();
        assert_eq!(
            character.chain(ChainKind::Spine).spec().tuning.iterations,
            32
        );
    }

    #[test]
    fn configured_stickiness_reaches_springy_chains() {
        let mut config = CharacterConfig::default();
        config.stickiness = 0.25;
        let character = Character::builder(quadruped_asset())
            .with_rig(test_rig_config())
            .with_config(config)
            .build()
            .unwrap();
        let spine = character.chain(ChainKind::Spine).spec();
        assert!((spine.tuning.stickiness - 0.25).abs() < 1e-6);
        // Non-springy chains keep their own tuning.
        let arm = character.chain(ChainKind::ArmLeft).spec();
        assert!(!arm.tuning.stick_to_initial);
    }

    #[test]
    fn idle_update_keeps_limbs_grounded() {
        let mut character = build(quadruped_asset()).unwrap();
        for _ in 0..240 {
            let events = character.update(1.0 / 60.0);
            assert!(events.is_empty(), "idle character must not step");
        }
        for limb in LimbId::ALL {
            assert_eq!(character.gait_phase(limb), GaitPhase::Grounded);
        }
    }

    #[test]
    fn update_is_finite_everywhere() {
        let mut character = build(quadruped_asset()).unwrap();
        character.begin_drag();
        character.set_touch_point(Vector3::new(0.4, 0.1, -0.2));
        for _ in 0..120 {
            character.update(1.0 / 60.0);
        }
        let skeleton = character.skeleton();
        for i in 0..skeleton.len() {
            let p = skeleton.world_position(i);
            assert!(p.iter().all(|v| v.is_finite()), "joint {i} went non-finite");
        }
    }
}
