//! Point-of-interest tracking.
//!
//! Input and camera are external collaborators reduced to latest-known
//! values: a camera world position and the world point under the user's
//! finger. Target resolution casts a ray from the camera through that
//! point and intersects it with a sphere pinned near the character,
//! falling back to the plane through the sphere's center. Coordinates are
//! in the character's parent space with the character at the origin.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use skink_core::math::{self, flatten_horizontal, look_rotation, Ray};
use skink_core::task::Cycle;

/// Target tracking tuning. Defaults match the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetConfig {
    /// Sphere radius cap around the character.
    pub radius: f32,
    /// Per-frame easing fraction toward the resolved point while dragging.
    pub approach: f32,
    /// Idle bobbing amplitude.
    pub bob_amplitude: f32,
    /// Idle bobbing period in seconds.
    pub bob_period: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            approach: 0.1,
            bob_amplitude: 0.05,
            bob_period: 2.0,
        }
    }
}

/// The tracked world-space target point.
#[derive(Debug, Clone)]
pub struct TargetTracker {
    config: TargetConfig,
    camera: Vector3<f32>,
    touch: Vector3<f32>,
    position: Vector3<f32>,
    rotation: UnitQuaternion<f32>,
    dragging: bool,
    idle_base: Vector3<f32>,
    bobbing: Option<Cycle>,
}

impl TargetTracker {
    /// Tracker starting at `position` with the camera at `camera`.
    #[must_use]
    pub fn new(config: TargetConfig, position: Vector3<f32>, camera: Vector3<f32>) -> Self {
        let mut tracker = Self {
            config,
            camera,
            touch: position,
            position,
            rotation: UnitQuaternion::identity(),
            dragging: false,
            idle_base: position,
            bobbing: None,
        };
        tracker.end_drag();
        tracker
    }

    /// Latest camera world position.
    pub const fn set_camera(&mut self, camera: Vector3<f32>) {
        self.camera = camera;
    }

    /// Latest world point under the input (unprojected by the host).
    pub const fn set_touch_point(&mut self, touch: Vector3<f32>) {
        self.touch = touch;
    }

    /// A drag gesture began: stop idle bobbing and start tracking touch.
    pub fn begin_drag(&mut self) {
        if let Some(bobbing) = &mut self.bobbing {
            bobbing.cancel();
        }
        self.bobbing = None;
        self.dragging = true;
    }

    /// The drag ended: resume idle bobbing around the last position.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.idle_base = self.position;
        self.bobbing = Some(Cycle::new(self.config.bob_period));
    }

    /// Whether a drag is currently active.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current target world position.
    #[must_use]
    pub const fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Current target rotation (always facing the camera).
    #[must_use]
    pub const fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    /// Resolve a reference point onto the target sphere or its fallback
    /// plane.
    ///
    /// The sphere pivot sits `r = min(radius, camera distance / 3)` from
    /// the origin along the camera's flattened horizontal direction; a ray
    /// from the camera through `reference` hits the sphere first, then the
    /// plane through the pivot with the same normal. `None` only when the
    /// geometry is fully degenerate (camera on the reference point and no
    /// plane to hit).
    #[must_use]
    pub fn acquire(&self, reference: &Vector3<f32>) -> Option<Vector3<f32>> {
        let ray = Ray::between(&self.camera, reference)?;
        let horz_to_cam = flatten_horizontal(&self.camera)
            .unwrap_or_else(|| Unit::new_unchecked(math::FORWARD));
        let r = self.config.radius.min(self.camera.norm() / 3.0);
        let pivot = horz_to_cam.as_ref() * r;

        ray.intersect_sphere(&pivot, r)
            .or_else(|| ray.intersect_plane(&horz_to_cam, &pivot))
    }

    /// Advance the tracker by one frame.
    pub fn update(&mut self, dt: f32) {
        if self.dragging {
            if let Some(point) = self.acquire(&self.touch) {
                self.position += (point - self.position) * self.config.approach;
            }
        } else {
            let phase = self
                .bobbing
                .as_mut()
                .and_then(|bobbing| bobbing.tick(dt))
                .map(|(phase, _)| phase);
            if let Some(phase) = phase {
                if let Some(base) = self.acquire(&self.idle_base) {
                    self.idle_base = base;
                }
                let lift =
                    self.config.bob_amplitude * (phase * std::f32::consts::TAU).sin();
                self.position = self.idle_base + math::UP * lift;
            }
        }

        // The target always re-faces the camera.
        self.rotation = look_rotation(&(self.camera - self.position), &math::UP);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tracker() -> TargetTracker {
        TargetTracker::new(
            TargetConfig::default(),
            Vector3::new(0.0, 0.0, 0.3),
            Vector3::new(0.0, 0.5, 3.0),
        )
    }

    #[test]
    fn ray_at_pivot_returns_point_at_radius() {
        let t = tracker();
        // Camera at distance 3.04 horizontally ~3: r = min(0.3, ~1) = 0.3.
        // The pivot sits 0.3 along the camera's horizontal direction (+Z).
        let pivot = Vector3::new(0.0, 0.0, 0.3);
        let hit = t.acquire(&pivot).unwrap();
        assert_relative_eq!((hit - pivot).norm(), 0.3, epsilon = 1e-4);
    }

    #[test]
    fn missing_the_sphere_falls_back_to_the_plane() {
        let t = tracker();
        // Aim far above the sphere: the hit must land on the plane through
        // the pivot with the horizontal camera direction as its normal.
        let reference = Vector3::new(0.0, 2.0, 0.3);
        let hit = t.acquire(&reference).unwrap();
        let pivot = Vector3::new(0.0, 0.0, 0.3);
        let normal = Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!((hit - pivot).dot(&normal), 0.0, epsilon = 1e-4);
        assert!((hit - pivot).norm() > 0.3);
    }

    #[test]
    fn radius_shrinks_with_a_close_camera() {
        let mut t = tracker();
        t.set_camera(Vector3::new(0.0, 0.0, 0.6)); // distance 0.6, r = 0.2
        let pivot = Vector3::new(0.0, 0.0, 0.2);
        let hit = t.acquire(&pivot).unwrap();
        assert_relative_eq!((hit - pivot).norm(), 0.2, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_camera_on_reference_is_none() {
        let t = tracker();
        let cam = Vector3::new(0.0, 0.5, 3.0);
        assert!(t.acquire(&cam).is_none());
    }

    #[test]
    fn dragging_eases_toward_the_resolved_point() {
        let mut t = tracker();
        t.begin_drag();
        t.set_touch_point(Vector3::new(0.2, 0.0, 0.2));
        let before = t.position();
        t.update(1.0 / 60.0);
        let after = t.position();
        assert!((after - before).norm() > 0.0, "target should move");
        // 10% easing: far from converged after one frame.
        let resolved = t.acquire(&Vector3::new(0.2, 0.0, 0.2)).unwrap();
        assert!((after - resolved).norm() > (after - before).norm());
    }

    #[test]
    fn idle_target_bobs_vertically() {
        let mut t = tracker();
        assert!(!t.is_dragging());
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for _ in 0..120 {
            t.update(1.0 / 60.0); // two full seconds: one bob period
            min_y = min_y.min(t.position().y);
            max_y = max_y.max(t.position().y);
        }
        assert!(max_y - min_y > 0.05, "bobbing should move the target");
        assert!(max_y - min_y < 0.25, "bobbing amplitude is small");
    }

    #[test]
    fn begin_drag_stops_bobbing() {
        let mut t = tracker();
        t.update(0.5);
        t.begin_drag();
        let frozen = t.position();
        // No touch updates: position must hold still.
        t.set_touch_point(frozen);
        let before = t.position();
        t.update(0.5);
        let drift = (t.position() - before).norm();
        assert!(drift < 0.05, "no bobbing while dragging");
    }

    #[test]
    fn target_faces_the_camera() {
        let mut t = tracker();
        t.update(1.0 / 60.0);
        let to_camera = (Vector3::new(0.0, 0.5, 3.0) - t.position()).normalize();
        let facing = t.rotation() * math::FORWARD;
        assert_relative_eq!(facing, to_camera, epsilon = 1e-4);
    }
}
