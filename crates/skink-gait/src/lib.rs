//! Gait control for the skink procedural animation workspace.
//!
//! Each limb runs a small state machine:
//!
//! ```text
//! Grounded ──(drift > threshold, partner not blocking)──► Pending
//! Pending ──(next frame)──► Stepping ──(arc complete)──► Grounded
//! ```
//!
//! While grounded, a limb's chain target stays pinned at its planted
//! anchor; a step replants the foot at the (moving) rest position along an
//! arcing trajectory. Mirrored limbs exclude each other from stepping
//! simultaneously during the first 40% of a step.

pub mod controller;
pub mod limb;
pub mod step;

pub use controller::{GaitConfig, GaitController, GaitEvent, GaitPhase, GaitUpdate};
pub use limb::LimbId;
pub use step::{step_duration, StepAnimation, StepTick};
