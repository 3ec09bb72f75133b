//! Character assembly for the skink procedural animation workspace.
//!
//! Wires a resolved skeleton, the six IK chains, the gait controller, and
//! the steering controllers into a single [`Character`] with one frame
//! entry point, plus the Bevy plugin that drives it inside the
//! [`SkinkSet`](skink_core::SkinkSet) ordering.

pub mod character;
pub mod config;
pub mod plugin;

pub use character::{Character, CharacterBuilder};
pub use config::CharacterConfig;
pub use plugin::{CharacterRig, SkinkCharacterPlugin};
