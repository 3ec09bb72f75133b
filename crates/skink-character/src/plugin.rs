//! Bevy ECS integration.
//!
//! [`SkinkCharacterPlugin`] drives a [`Character`] resource through the
//! [`SkinkSet`] chain each frame: steering, spine/tail solve, gait, limb
//! solves. Insert a [`CharacterRig`] resource after building the character
//! to activate it; without one the systems are no-ops.

use bevy::log::debug;
use bevy::prelude::*;

use skink_core::SkinkSet;

use crate::character::Character;

/// Resource wrapper around the active character.
#[derive(Resource)]
pub struct CharacterRig(pub Character);

/// Plugin that runs the character's frame pipeline inside the
/// [`SkinkSet`] ordering. Requires
/// [`SkinkCorePlugin`](skink_core::SkinkCorePlugin).
pub struct SkinkCharacterPlugin;

impl Plugin for SkinkCharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                steer_system.in_set(SkinkSet::Steer),
                solve_spine_system.in_set(SkinkSet::SolveSpine),
                gait_system.in_set(SkinkSet::Gait),
                solve_limbs_system.in_set(SkinkSet::SolveLimbs),
            ),
        );
    }
}

#[allow(clippy::needless_pass_by_value)]
fn steer_system(time: Res<Time>, rig: Option<ResMut<CharacterRig>>) {
    if let Some(mut rig) = rig {
        rig.0.steer_frame(time.delta_secs());
    }
}

fn solve_spine_system(rig: Option<ResMut<CharacterRig>>) {
    if let Some(mut rig) = rig {
        rig.0.solve_spine_frame();
    }
}

fn gait_system(rig: Option<ResMut<CharacterRig>>) {
    if let Some(mut rig) = rig {
        for (limb, event) in rig.0.gait_frame() {
            debug!("gait: {limb} {event:?}");
        }
    }
}

fn solve_limbs_system(rig: Option<ResMut<CharacterRig>>) {
    if let Some(mut rig) = rig {
        rig.0.solve_limbs_frame();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skink_core::SkinkCorePlugin;
    use skink_gait::{GaitPhase, LimbId};
    use skink_test_utils::{quadruped_asset, test_rig_config};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(SkinkCorePlugin);
        app.add_plugins(SkinkCharacterPlugin);
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn plugin_without_character_is_a_noop() {
        let mut app = test_app();
        app.update();
        app.update();
    }

    #[test]
    fn plugin_drives_the_character() {
        let mut app = test_app();
        let character = Character::builder(quadruped_asset())
            .with_rig(test_rig_config())
            .build()
            .unwrap();
        app.insert_resource(CharacterRig(character));

        for _ in 0..5 {
            app.update();
        }

        let rig = app.world().resource::<CharacterRig>();
        for limb in LimbId::ALL {
            assert_eq!(rig.0.gait_phase(limb), GaitPhase::Grounded);
        }
    }
}
