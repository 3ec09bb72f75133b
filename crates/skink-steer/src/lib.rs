//! Target tracking and body orientation for the skink procedural
//! animation workspace.
//!
//! [`TargetTracker`] turns raw input (a camera position and the latest
//! touch point) into a single world-space point of interest, bobbing idly
//! when no drag is active. [`OrientationController`] turns the body toward
//! that point each frame, curves the spine and tail chain targets, and
//! keeps the head gazing at it.

pub mod orient;
pub mod target;

pub use orient::{OrientationController, SteerConfig, SteerOutcome};
pub use target::{TargetConfig, TargetTracker};
