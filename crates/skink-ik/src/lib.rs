//! Inverse kinematics for the skink procedural animation workspace.
//!
//! Provides fixed-bone-length chain solving over a resolved
//! [`Skeleton`](skink_rig::Skeleton):
//!
//! ```text
//! ChainSpec table ──► IkChain ──► solver (FABRIK | two-bone) ──► pole resolver ──► skeleton
//! ```
//!
//! An [`IkChain`] is built once per chain kind from the static
//! [`ChainSpec`] table and never changes topology afterwards. Each frame
//! the chain pulls current world positions from the skeleton, solves
//! toward its target, and writes positions and orientations back through
//! the skeleton's transform interface.

pub mod chain;
pub mod pole;
pub mod solver;

pub use chain::{ChainKind, ChainSpec, ChainTuning, IkChain, UpSource};
pub use pole::PoleSpec;
