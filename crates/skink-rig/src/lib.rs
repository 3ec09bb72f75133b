//! Skeleton configuration for the skink procedural animation workspace.
//!
//! Maps abstract [`JointRole`]s onto concretely authored skeleton joints,
//! normalizing heterogeneous authoring conventions through per-joint
//! reference bases, and exposes the resolved [`Skeleton`] with world-space
//! pose evaluation.
//!
//! ```text
//! SkeletonAsset + RigConfig ──► Skeleton ──► chains / controllers
//! ```
//!
//! Resolution is all-or-nothing: a required role with no authored
//! counterpart aborts character construction.

pub mod basis;
pub mod config;
pub mod roles;
pub mod skeleton;

pub use basis::JointBasis;
pub use config::RigConfig;
pub use roles::JointRole;
pub use skeleton::{AuthoredJoint, Skeleton, SkeletonAsset};
