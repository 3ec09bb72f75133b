//! Chain solving algorithms.
//!
//! Two interchangeable algorithms, selected per chain:
//!
//! - [`solve_fabrik`]: the general iterative solver. Alternating
//!   forward/backward passes that preserve bone lengths; targets beyond the
//!   chain's reach converge to the fully extended straight chain, which is
//!   expected behavior, not an error.
//! - [`solve_two_bone`]: exact law-of-cosines solution for the common
//!   2-bone limb case. Non-iterative, so it avoids the iteration cost and
//!   solver jitter of the general algorithm.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use skink_core::math::{self, dir_to};

/// Tip-to-target distance below which the iterative solver stops early.
pub const CONVERGENCE_EPSILON: f32 = 1.0e-4;

/// Direction used when two chain points coincide and no meaningful
/// direction exists.
const DEGENERATE_DIR: Vector3<f32> = math::FORWARD;

fn dir_or_default(from: &Vector3<f32>, to: &Vector3<f32>) -> Unit<Vector3<f32>> {
    dir_to(from, to).unwrap_or_else(|| Unit::new_unchecked(DEGENERATE_DIR))
}

/// Iterative forward-and-backward solve over `positions[start..]`.
///
/// `lengths[i]` is the fixed distance between nodes `i` and `i + 1`; nodes
/// before `start` are rigid anchors and are never touched. Each iteration
/// runs a forward pass (tip snapped to the target, predecessors pulled
/// along, the sub-chain root coming off its anchor) and a backward pass
/// (root re-pinned, successors pushed out). Iteration stops early once the
/// tip is within [`CONVERGENCE_EPSILON`] of the target.
pub fn solve_fabrik(
    positions: &mut [Vector3<f32>],
    lengths: &[f32],
    start: usize,
    target: &Vector3<f32>,
    iterations: u32,
) {
    let n = positions.len();
    debug_assert_eq!(lengths.len() + 1, n);
    if n < 2 || start >= n - 1 {
        return;
    }

    let anchor = positions[start];

    for _ in 0..iterations.max(1) {
        // Forward pass: tip to target, walk back preserving lengths.
        positions[n - 1] = *target;
        for i in (start..n - 1).rev() {
            let dir = dir_or_default(&positions[i + 1], &positions[i]);
            positions[i] = positions[i + 1] + dir.as_ref() * lengths[i];
        }

        // Backward pass: root back onto its anchor, walk out to the tip.
        positions[start] = anchor;
        for i in start + 1..n {
            let dir = dir_or_default(&positions[i - 1], &positions[i]);
            positions[i] = positions[i - 1] + dir.as_ref() * lengths[i - 1];
        }

        if (positions[n - 1] - target).norm() < CONVERGENCE_EPSILON {
            break;
        }
    }
}

/// Exact two-bone solve via the law of cosines.
///
/// Given the fixed `root`, the segment lengths `upper` and `lower`, and a
/// `bend_normal` defining the bend plane (oriented so the mid joint bends
/// toward the pole side), returns the mid and tip positions. The cosine is
/// clamped to [-1, 1], so unreachable targets yield the fully extended
/// chain and too-close targets the fully folded one.
#[must_use]
pub fn solve_two_bone(
    root: &Vector3<f32>,
    target: &Vector3<f32>,
    upper: f32,
    lower: f32,
    bend_normal: &Unit<Vector3<f32>>,
) -> (Vector3<f32>, Vector3<f32>) {
    let Some(dir) = dir_to(root, target) else {
        // Target sits on the root: fold straight down the degenerate axis.
        let mid = root + DEGENERATE_DIR * upper;
        return (mid, mid - DEGENERATE_DIR * lower);
    };

    let reach = (target - root).norm();
    let cos_root = ((upper * upper + reach * reach - lower * lower)
        / (2.0 * upper * reach.max(f32::EPSILON)))
    .clamp(-1.0, 1.0);
    let root_angle = cos_root.acos();

    // Rotating the root->target direction by -angle about the bend normal
    // swings the mid joint toward the pole side of the plane.
    let swing = UnitQuaternion::from_axis_angle(bend_normal, -root_angle);
    let mid = root + swing * (dir.as_ref() * upper);
    let tip = mid + dir_or_default(&mid, target).as_ref() * lower;
    (mid, tip)
}

/// Largest deviation of adjacent-node distances from the expected bone
/// lengths over `positions[start..]`. Diagnostic used by tests and debug
/// assertions.
#[must_use]
pub fn max_length_error(positions: &[Vector3<f32>], lengths: &[f32], start: usize) -> f32 {
    let mut worst = 0.0_f32;
    for i in start..positions.len() - 1 {
        let d = (positions[i + 1] - positions[i]).norm();
        worst = worst.max((d - lengths[i]).abs());
    }
    worst
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
