//! End-to-end locomotion scenario: an idle character never steps; dragging
//! the target far enough to the side turns the body and triggers stepping,
//! with mirrored limbs never both inside the first 40% of a step.

use nalgebra::Vector3;

use skink_character::Character;
use skink_gait::{GaitEvent, GaitPhase, LimbId};
use skink_test_utils::{quadruped_asset, test_rig_config};

const DT: f32 = 1.0 / 60.0;

fn character() -> Character {
    Character::builder(quadruped_asset())
        .with_rig(test_rig_config())
        .build()
        .unwrap()
}

#[test]
fn idle_character_keeps_all_limbs_grounded() {
    let mut character = character();

    // Ten simulated seconds of idle bobbing: rest drift stays zero, so no
    // limb may ever leave Grounded.
    for _ in 0..600 {
        let events = character.update(DT);
        assert!(events.is_empty(), "idle character stepped: {events:?}");
        for limb in LimbId::ALL {
            assert_eq!(character.gait_phase(limb), GaitPhase::Grounded);
        }
    }
}

#[test]
fn dragging_the_target_sideways_triggers_stepping() {
    let mut character = character();
    character.begin_drag();
    character.set_touch_point(Vector3::new(1.0, 0.2, 0.3));

    let mut scheduled = Vec::new();
    for _ in 0..600 {
        for (limb, event) in character.update(DT) {
            if event == GaitEvent::StepScheduled {
                scheduled.push(limb);
            }
        }

        // Invariant: at most one limb of a mirrored pair inside the
        // blocking window at any time.
        for limb in LimbId::ALL {
            assert!(
                !(character.is_blocking(limb) && character.is_blocking(limb.mirror())),
                "mirrored pair both blocking: {limb}"
            );
        }
    }

    assert!(
        !scheduled.is_empty(),
        "turning toward a lateral target must trigger steps"
    );
}

#[test]
fn first_step_of_a_pair_is_exclusive() {
    let mut character = character();
    character.begin_drag();
    character.set_touch_point(Vector3::new(1.0, 0.2, 0.3));

    // Run until the first arm or leg schedules a step.
    let mut first: Option<LimbId> = None;
    'outer: for _ in 0..600 {
        for (limb, event) in character.update(DT) {
            if event == GaitEvent::StepScheduled {
                first = Some(limb);
                break 'outer;
            }
        }
    }
    let first = first.expect("a step must have been scheduled");

    // On the detection frame, the partner is grounded and stays grounded
    // through the scheduling frame.
    assert!(character.is_blocking(first));
    assert_eq!(character.gait_phase(first.mirror()), GaitPhase::Grounded);

    // One more frame: the step starts; the partner is still excluded.
    character.update(DT);
    assert_eq!(character.gait_phase(first), GaitPhase::Stepping);
    assert_eq!(character.gait_phase(first.mirror()), GaitPhase::Grounded);
}

#[test]
fn stepped_limb_eventually_regrounds() {
    let mut character = character();
    character.begin_drag();
    character.set_touch_point(Vector3::new(0.8, 0.2, 0.6));

    let mut completed = false;
    for _ in 0..1200 {
        for (_, event) in character.update(DT) {
            if event == GaitEvent::StepCompleted {
                completed = true;
            }
        }
    }
    assert!(completed, "steps must complete and reground");

    // Once the body has fully aligned with the stationary target, the
    // character settles: run on and require everything grounded at the end.
    for _ in 0..1200 {
        character.update(DT);
    }
    for limb in LimbId::ALL {
        assert_eq!(character.gait_phase(limb), GaitPhase::Grounded);
    }
}

#[test]
fn body_turns_toward_the_dragged_target() {
    let mut character = character();
    character.begin_drag();
    character.set_touch_point(Vector3::new(1.0, 0.2, 0.0));

    for _ in 0..1200 {
        character.update(DT);
    }

    let forward = character.skeleton().body_forward();
    let target = character.target_position() - character.skeleton().body_position();
    let dir = Vector3::new(target.x, 0.0, target.z).normalize();
    assert!(
        forward.dot(&dir) > 0.99,
        "body should end up facing the target, dot = {}",
        forward.dot(&dir)
    );
}
