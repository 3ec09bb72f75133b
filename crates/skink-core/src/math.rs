//! Shared vector math for the animation crates.
//!
//! Positions and directions are plain `Vector3<f32>` in a right-handed,
//! Y-up world: +Z is the canonical forward, +X the canonical right.
//! Degenerate inputs (zero-length directions, collinear frames) get defined
//! fallbacks rather than panics; the solvers rely on that.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Tolerance below which a direction is treated as degenerate.
pub const DIR_EPSILON: f32 = 1.0e-6;

pub const FORWARD: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);
pub const BACK: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);
pub const UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
pub const DOWN: Vector3<f32> = Vector3::new(0.0, -1.0, 0.0);
pub const RIGHT: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);
pub const LEFT: Vector3<f32> = Vector3::new(-1.0, 0.0, 0.0);

/// Hermite smoothstep clamped to [0, 1].
#[must_use]
pub fn smoothstep01(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Unit direction from `a` to `b`, or `None` if the points coincide.
#[must_use]
pub fn dir_to(a: &Vector3<f32>, b: &Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new(b - a, DIR_EPSILON)
}

/// Height-flattened unit direction: `v` with its Y component zeroed, then
/// normalized. `None` when the horizontal part is degenerate.
#[must_use]
pub fn flatten_horizontal(v: &Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new(Vector3::new(v.x, 0.0, v.z), DIR_EPSILON)
}

/// Rotation whose canonical forward (+Z) points along `forward` with +Y
/// aligned as closely as possible to `up`.
///
/// Falls back to the identity for a degenerate forward, and substitutes an
/// alternate up axis when `forward` and `up` are collinear.
#[must_use]
pub fn look_rotation(forward: &Vector3<f32>, up: &Vector3<f32>) -> UnitQuaternion<f32> {
    if forward.norm_squared() < DIR_EPSILON * DIR_EPSILON {
        return UnitQuaternion::identity();
    }
    let up = if forward.cross(up).norm_squared() < DIR_EPSILON * DIR_EPSILON {
        // Collinear: any perpendicular axis will do for the twist reference.
        if forward.cross(&UP).norm_squared() < DIR_EPSILON * DIR_EPSILON {
            FORWARD
        } else {
            UP
        }
    } else {
        *up
    };
    UnitQuaternion::face_towards(forward, &up)
}

/// Spherically interpolate `from` a fraction `t` of the way to `to`.
///
/// Uses nlerp when the quaternions are near-antipodal and slerp is
/// ill-conditioned.
#[must_use]
pub fn rotate_towards(
    from: &UnitQuaternion<f32>,
    to: &UnitQuaternion<f32>,
    t: f32,
) -> UnitQuaternion<f32> {
    let t = t.clamp(0.0, 1.0);
    from.try_slerp(to, t, 1.0e-9)
        .unwrap_or_else(|| from.nlerp(to, t))
}

/// Rotate direction `from` a fraction `t` of the angle toward `to`.
///
/// Exactly opposite directions have no unique rotation plane; the world up
/// axis is used as the hinge in that case.
#[must_use]
pub fn rotate_dir_towards(
    from: &Unit<Vector3<f32>>,
    to: &Unit<Vector3<f32>>,
    t: f32,
) -> Unit<Vector3<f32>> {
    let t = t.clamp(0.0, 1.0);
    match UnitQuaternion::rotation_between(from.as_ref(), to.as_ref()) {
        Some(q) => Unit::new_normalize(q.powf(t) * from.as_ref()),
        None => {
            let hinge = if from.cross(&UP).norm_squared() < DIR_EPSILON * DIR_EPSILON {
                Unit::new_unchecked(RIGHT)
            } else {
                Unit::new_unchecked(UP)
            };
            let q = UnitQuaternion::from_axis_angle(&hinge, std::f32::consts::PI * t);
            Unit::new_normalize(q * from.as_ref())
        }
    }
}

/// Reflect direction `v` across the plane with unit normal `normal`.
#[must_use]
pub fn reflect_vector(v: &Vector3<f32>, normal: &Unit<Vector3<f32>>) -> Vector3<f32> {
    v - normal.as_ref() * (2.0 * v.dot(normal.as_ref()))
}

/// Reflect `point` across the plane through `plane_point` with unit normal
/// `normal`.
#[must_use]
pub fn reflect_over_plane(
    point: &Vector3<f32>,
    normal: &Unit<Vector3<f32>>,
    plane_point: &Vector3<f32>,
) -> Vector3<f32> {
    let offset = point - plane_point;
    point - normal.as_ref() * (2.0 * offset.dot(normal.as_ref()))
}

/// Unit normal of the plane through three points, or `None` when the points
/// are collinear. The normal direction follows the winding `a -> b -> c`.
#[must_use]
pub fn plane_normal(
    a: &Vector3<f32>,
    b: &Vector3<f32>,
    c: &Vector3<f32>,
) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new((b - a).cross(&(c - a)), DIR_EPSILON)
}

/// Evaluate the quadratic Bezier with endpoints `p0`, `p1` and control point
/// `control` at parameter `t` in [0, 1].
#[must_use]
pub fn quadratic_bezier(
    p0: &Vector3<f32>,
    control: &Vector3<f32>,
    p1: &Vector3<f32>,
    t: f32,
) -> Vector3<f32> {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    p0 * (u * u) + control * (2.0 * u * t) + p1 * (t * t)
}

// ---------------------------------------------------------------------------
// Ray
// ---------------------------------------------------------------------------

/// A ray with unit direction, used for target acquisition.
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub dir: Unit<Vector3<f32>>,
}

impl Ray {
    /// Ray from `origin` toward `through`. `None` if the points coincide.
    #[must_use]
    pub fn between(origin: &Vector3<f32>, through: &Vector3<f32>) -> Option<Self> {
        dir_to(origin, through).map(|dir| Self {
            origin: *origin,
            dir,
        })
    }

    /// Nearest forward intersection with a sphere, if any.
    #[must_use]
    pub fn intersect_sphere(&self, center: &Vector3<f32>, radius: f32) -> Option<Vector3<f32>> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir.as_ref());
        let c = oc.norm_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t = if -b - sqrt_disc >= 0.0 {
            -b - sqrt_disc
        } else if -b + sqrt_disc >= 0.0 {
            -b + sqrt_disc
        } else {
            return None;
        };
        Some(self.origin + self.dir.as_ref() * t)
    }

    /// Forward intersection with the plane through `point` with unit normal
    /// `normal`. `None` when the ray is parallel to the plane or the plane
    /// is behind the origin.
    #[must_use]
    pub fn intersect_plane(
        &self,
        normal: &Unit<Vector3<f32>>,
        point: &Vector3<f32>,
    ) -> Option<Vector3<f32>> {
        let denom = self.dir.dot(normal.as_ref());
        if denom.abs() < DIR_EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal.as_ref()) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.dir.as_ref() * t)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_relative_eq!(smoothstep01(0.0), 0.0);
        assert_relative_eq!(smoothstep01(1.0), 1.0);
        assert_relative_eq!(smoothstep01(0.5), 0.5);
        // Clamped outside [0, 1]
        assert_relative_eq!(smoothstep01(-2.0), 0.0);
        assert_relative_eq!(smoothstep01(3.0), 1.0);
    }

    #[test]
    fn smoothstep_eases_in_and_out() {
        assert!(smoothstep01(0.25) < 0.25);
        assert!(smoothstep01(0.75) > 0.75);
    }

    #[test]
    fn dir_to_unit_length() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 2.0, 3.0);
        let d = dir_to(&a, &b).unwrap();
        assert_relative_eq!(d.as_ref(), &RIGHT, epsilon = 1e-6);
    }

    #[test]
    fn dir_to_coincident_points_is_none() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        assert!(dir_to(&a, &a).is_none());
    }

    #[test]
    fn flatten_horizontal_drops_height() {
        let v = Vector3::new(0.0, 5.0, 1.0);
        let d = flatten_horizontal(&v).unwrap();
        assert_relative_eq!(d.as_ref(), &FORWARD, epsilon = 1e-6);
    }

    #[test]
    fn flatten_horizontal_vertical_is_none() {
        assert!(flatten_horizontal(&Vector3::new(0.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn look_rotation_maps_forward() {
        let q = look_rotation(&RIGHT, &UP);
        let fw = q * FORWARD;
        assert_relative_eq!(fw, RIGHT, epsilon = 1e-6);
        let up = q * UP;
        assert_relative_eq!(up, UP, epsilon = 1e-6);
    }

    #[test]
    fn look_rotation_degenerate_forward_is_identity() {
        let q = look_rotation(&Vector3::zeros(), &UP);
        assert_relative_eq!(q.angle(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn look_rotation_collinear_up_does_not_produce_nan() {
        let q = look_rotation(&UP, &UP);
        let fw = q * FORWARD;
        assert!(fw.iter().all(|v| v.is_finite()));
        assert_relative_eq!(fw, UP, epsilon = 1e-6);
    }

    #[test]
    fn rotate_towards_fraction() {
        let from = UnitQuaternion::identity();
        let to = UnitQuaternion::from_axis_angle(&Unit::new_normalize(UP), 1.0);
        let half = rotate_towards(&from, &to, 0.5);
        assert_relative_eq!(half.angle(), 0.5, epsilon = 1e-5);
        let full = rotate_towards(&from, &to, 1.0);
        assert_relative_eq!(full.angle(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotate_towards_clamps_t() {
        let from = UnitQuaternion::identity();
        let to = UnitQuaternion::from_axis_angle(&Unit::new_normalize(UP), 1.0);
        let over = rotate_towards(&from, &to, 2.5);
        assert_relative_eq!(over.angle(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotate_dir_towards_halfway() {
        let from = Unit::new_normalize(FORWARD);
        let to = Unit::new_normalize(RIGHT);
        let half = rotate_dir_towards(&from, &to, 0.5);
        // Halfway between +Z and +X in the horizontal plane.
        let expected = Unit::new_normalize(Vector3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(half.into_inner(), expected.into_inner(), epsilon = 1e-5);
    }

    #[test]
    fn rotate_dir_towards_full_reaches_target() {
        let from = Unit::new_normalize(FORWARD);
        let to = Unit::new_normalize(Vector3::new(0.3, 0.5, -0.2));
        let out = rotate_dir_towards(&from, &to, 1.0);
        assert_relative_eq!(out.into_inner(), to.into_inner(), epsilon = 1e-5);
    }

    #[test]
    fn rotate_dir_towards_opposite_hinges_on_up() {
        let from = Unit::new_normalize(FORWARD);
        let to = Unit::new_normalize(BACK);
        let half = rotate_dir_towards(&from, &to, 0.5);
        assert!(half.into_inner().iter().all(|v| v.is_finite()));
        // Halfway through a U-turn about the up axis: pointing sideways.
        assert_relative_eq!(half.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(half.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn reflect_vector_across_sagittal_plane() {
        let n = Unit::new_normalize(RIGHT);
        let v = Vector3::new(0.6, 0.1, 0.8);
        let r = reflect_vector(&v, &n);
        assert_relative_eq!(r, Vector3::new(-0.6, 0.1, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn reflect_over_plane_mirrors() {
        // Reflect (1, 0, 1) across the Y-Z plane through the origin.
        let n = Unit::new_normalize(RIGHT);
        let p = Vector3::new(1.0, 0.0, 1.0);
        let r = reflect_over_plane(&p, &n, &Vector3::zeros());
        assert_relative_eq!(r, Vector3::new(-1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn reflect_over_plane_point_on_plane_unchanged() {
        let n = Unit::new_normalize(UP);
        let p = Vector3::new(3.0, 1.0, -2.0);
        let r = reflect_over_plane(&p, &n, &Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(r, p, epsilon = 1e-6);
    }

    #[test]
    fn plane_normal_is_unit_and_orthogonal() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 0.0, 1.0);
        let n = plane_normal(&a, &b, &c).unwrap();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.dot(&(b - a)), 0.0, epsilon = 1e-6);
        assert_relative_eq!(n.dot(&(c - a)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn plane_normal_winding_flips_sign() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 0.0, 1.0);
        let n1 = plane_normal(&a, &b, &c).unwrap();
        let n2 = plane_normal(&c, &b, &a).unwrap();
        assert_relative_eq!(n1.as_ref(), &(-n2.into_inner()), epsilon = 1e-6);
    }

    #[test]
    fn plane_normal_collinear_is_none() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let c = Vector3::new(2.0, 0.0, 0.0);
        assert!(plane_normal(&a, &b, &c).is_none());
    }

    #[test]
    fn bezier_endpoints() {
        let p0 = Vector3::new(0.0, 0.0, 0.0);
        let c = Vector3::new(0.5, 1.0, 0.0);
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(quadratic_bezier(&p0, &c, &p1, 0.0), p0);
        assert_relative_eq!(quadratic_bezier(&p0, &c, &p1, 1.0), p1);
    }

    #[test]
    fn bezier_midpoint_lifts_toward_control() {
        let p0 = Vector3::new(0.0, 0.0, 0.0);
        let c = Vector3::new(0.5, 1.0, 0.0);
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let mid = quadratic_bezier(&p0, &c, &p1, 0.5);
        assert_relative_eq!(mid, Vector3::new(0.5, 0.5, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn ray_hits_sphere_head_on() {
        let ray = Ray::between(&Vector3::new(0.0, 0.0, -5.0), &Vector3::zeros()).unwrap();
        let hit = ray.intersect_sphere(&Vector3::zeros(), 1.0).unwrap();
        assert_relative_eq!(hit, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn ray_misses_sphere() {
        let ray = Ray::between(&Vector3::new(0.0, 5.0, -5.0), &Vector3::new(0.0, 5.0, 5.0)).unwrap();
        assert!(ray.intersect_sphere(&Vector3::zeros(), 1.0).is_none());
    }

    #[test]
    fn ray_inside_sphere_exits() {
        let ray = Ray::between(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let hit = ray.intersect_sphere(&Vector3::zeros(), 2.0).unwrap();
        assert_relative_eq!(hit, Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn ray_hits_plane() {
        let ray = Ray::between(&Vector3::new(0.0, 2.0, 0.0), &Vector3::new(0.0, 1.0, 0.0)).unwrap();
        let n = Unit::new_normalize(UP);
        let hit = ray.intersect_plane(&n, &Vector3::zeros()).unwrap();
        assert_relative_eq!(hit, Vector3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn ray_parallel_to_plane_is_none() {
        let ray = Ray::between(&Vector3::new(0.0, 1.0, 0.0), &Vector3::new(1.0, 1.0, 0.0)).unwrap();
        let n = Unit::new_normalize(UP);
        assert!(ray.intersect_plane(&n, &Vector3::zeros()).is_none());
    }

    #[test]
    fn ray_plane_behind_origin_is_none() {
        let ray = Ray::between(&Vector3::new(0.0, 1.0, 0.0), &Vector3::new(0.0, 2.0, 0.0)).unwrap();
        let n = Unit::new_normalize(UP);
        assert!(ray.intersect_plane(&n, &Vector3::zeros()).is_none());
    }
}
