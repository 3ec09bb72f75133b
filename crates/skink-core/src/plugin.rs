//! Bevy integration: system-set ordering and the frame clock resource.
//!
//! The [`SkinkSet`] chain encodes the frame-ordering guarantees the
//! animation pipeline relies on: steering runs first, the spine/tail solve
//! completes before any limb grounding check, and limb solves run last.

use bevy::prelude::*;

use crate::time::FrameClock;

/// System sets for the per-frame animation pipeline, executed in order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinkSet {
    /// Target tracking, body turning, spine/tail/head targets.
    Steer,
    /// Spine and tail chain solves.
    SolveSpine,
    /// Gait grounding checks and step scheduling (strictly after the spine
    /// solve).
    Gait,
    /// Limb chain solves and orientation write-back.
    SolveLimbs,
}

/// Core plugin: registers the [`SkinkSet`] ordering and the [`FrameClock`].
pub struct SkinkCorePlugin;

impl Plugin for SkinkCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameClock>()
            .init_resource::<Time>()
            .configure_sets(
                Update,
                (
                    SkinkSet::Steer,
                    SkinkSet::SolveSpine,
                    SkinkSet::Gait,
                    SkinkSet::SolveLimbs,
                )
                    .chain(),
            )
            .add_systems(Update, tick_frame_clock.before(SkinkSet::Steer));
    }
}

/// Feed the engine frame delta into the [`FrameClock`].
#[allow(clippy::needless_pass_by_value)]
fn tick_frame_clock(time: Res<Time>, mut clock: ResMut<FrameClock>) {
    clock.tick(time.delta_secs());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_registers_frame_clock() {
        let mut app = App::new();
        app.add_plugins(SkinkCorePlugin);
        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get_resource::<FrameClock>().is_some());
    }

    #[test]
    fn frame_clock_ticks_on_update() {
        let mut app = App::new();
        app.add_plugins(SkinkCorePlugin);
        app.finish();
        app.cleanup();
        app.update();
        app.update();

        let clock = app.world().resource::<FrameClock>();
        assert_eq!(clock.ticks(), 2);
    }
}
