//! Ray/sphere intersection.

use kdray_core::Sphere;
use kdray_math::Ray;

use crate::candidates::Candidates;

/// Roots of `|o + t·d|² = r²`.
///
/// A negative discriminant misses, zero gives the single tangent root and
/// a positive one gives both crossings. Normals point outward.
pub fn intersect(sphere: &Sphere, ray: &Ray) -> Candidates {
    if ray.is_degenerate() {
        return Candidates::NONE;
    }

    let a = ray.direction.length_squared();
    let h = ray.direction.dot(ray.origin);
    let c = ray.origin.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return Candidates::NONE;
    }

    let normal_at = |t: f32| (ray.at(t) / sphere.radius).normalize_or_zero();

    if discriminant == 0.0 {
        let t = -h / a;
        return Candidates::one(t, normal_at(t));
    }

    let sqrtd = discriminant.sqrt();
    let t0 = (-h - sqrtd) / a;
    let t1 = (-h + sqrtd) / a;
    Candidates::two((t0, normal_at(t0)), (t1, normal_at(t1)))
}
