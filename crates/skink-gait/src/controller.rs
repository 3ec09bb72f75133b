//! Per-limb gait state machine.
//!
//! Drives the limb targets fed to the IK solver. The controller must be
//! ticked strictly after the frame's spine solve has been applied, so the
//! rest-position reference already reflects the bent spine.

use nalgebra::Vector3;

use crate::limb::LimbId;
use crate::step::StepAnimation;

/// Gait tuning. Defaults match the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitConfig {
    /// Drift between a planted anchor and the rest position that triggers
    /// a step.
    pub trigger_distance: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            trigger_distance: 0.02,
        }
    }
}

/// Externally visible phase of one limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitPhase {
    /// Planted at its anchor; the per-frame drift check is armed.
    Grounded,
    /// A step was detected this frame; the animation starts next frame.
    Pending,
    /// The step arc is in flight.
    Stepping,
}

/// Notable transition produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitEvent {
    /// Drift exceeded the threshold; a step is scheduled for next frame.
    StepScheduled,
    /// The step animation began.
    StepStarted,
    /// The limb replanted and re-armed its drift check.
    StepCompleted,
}

/// Result of ticking one limb.
#[derive(Debug, Clone, Copy)]
pub struct GaitUpdate {
    /// World-space target to feed the limb's IK chain this frame.
    pub target: Vector3<f32>,
    pub event: Option<GaitEvent>,
}

#[derive(Debug, Clone)]
enum Phase {
    Grounded { anchor: Vector3<f32> },
    Pending,
    Stepping { anim: StepAnimation },
}

#[derive(Debug, Clone)]
struct Limb {
    phase: Phase,
    blocking: bool,
}

/// State machine over all four limbs.
///
/// The `blocking` flag pair per mirrored limb set is read and then written
/// within a single frame evaluation; keep that atomic if this ever moves
/// off the frame-tick thread.
#[derive(Debug, Clone)]
pub struct GaitController {
    limbs: [Limb; 4],
    config: GaitConfig,
}

impl GaitController {
    /// Controller with every limb grounded at the given per-limb anchors
    /// (index by [`LimbId::index`]).
    #[must_use]
    pub fn new(config: GaitConfig, anchors: [Vector3<f32>; 4]) -> Self {
        let limbs = anchors.map(|anchor| Limb {
            phase: Phase::Grounded { anchor },
            blocking: false,
        });
        Self { limbs, config }
    }

    /// Current phase of a limb.
    #[must_use]
    pub fn phase(&self, limb: LimbId) -> GaitPhase {
        match self.limbs[limb.index()].phase {
            Phase::Grounded { .. } => GaitPhase::Grounded,
            Phase::Pending => GaitPhase::Pending,
            Phase::Stepping { .. } => GaitPhase::Stepping,
        }
    }

    /// Whether a limb currently blocks its mirrored partner.
    #[must_use]
    pub fn is_blocking(&self, limb: LimbId) -> bool {
        self.limbs[limb.index()].blocking
    }

    /// Advance one limb by one frame.
    ///
    /// `current` is the limb effector's world position, `rest` its
    /// rest/ideal world position for this frame (already reflecting the
    /// spine solve). Returns the chain target to solve toward.
    pub fn tick(
        &mut self,
        limb: LimbId,
        dt: f32,
        current: &Vector3<f32>,
        rest: &Vector3<f32>,
    ) -> GaitUpdate {
        let partner_blocking = self.limbs[limb.mirror().index()].blocking;
        let slot = &mut self.limbs[limb.index()];

        match &mut slot.phase {
            Phase::Grounded { anchor } => {
                let anchor = *anchor;
                if !partner_blocking && (rest - anchor).norm() > self.config.trigger_distance {
                    // The drift check is cancelled; the step itself is
                    // deferred to the next frame tick, never started within
                    // the frame that detected it.
                    slot.blocking = true;
                    slot.phase = Phase::Pending;
                    GaitUpdate {
                        target: anchor,
                        event: Some(GaitEvent::StepScheduled),
                    }
                } else {
                    // Keep the foot planted.
                    GaitUpdate {
                        target: anchor,
                        event: None,
                    }
                }
            }
            Phase::Pending => {
                let mut anim = StepAnimation::new(*current, (rest - current).norm());
                let tick = anim.tick(dt, rest);
                if tick.release_blocking {
                    slot.blocking = false;
                }
                if tick.finished {
                    slot.phase = Phase::Grounded { anchor: tick.position };
                    return GaitUpdate {
                        target: tick.position,
                        event: Some(GaitEvent::StepCompleted),
                    };
                }
                slot.phase = Phase::Stepping { anim };
                GaitUpdate {
                    target: tick.position,
                    event: Some(GaitEvent::StepStarted),
                }
            }
            Phase::Stepping { anim } => {
                let tick = anim.tick(dt, rest);
                if tick.release_blocking {
                    slot.blocking = false;
                }
                if tick.finished {
                    // Replant where the step landed and re-arm the check.
                    slot.blocking = false;
                    slot.phase = Phase::Grounded { anchor: tick.position };
                    return GaitUpdate {
                        target: tick.position,
                        event: Some(GaitEvent::StepCompleted),
                    };
                }
                GaitUpdate {
                    target: tick.position,
                    event: None,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
