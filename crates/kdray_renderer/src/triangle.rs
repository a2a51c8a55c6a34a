//! Ray/triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use kdray_math::{Ray, Vec3};

/// Where a ray crosses a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    /// Barycentric weight of the second corner
    pub u: f32,
    /// Barycentric weight of the third corner
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection algorithm.
///
/// Reports the crossing of the ray's line with the triangle without looking
/// at the ray's bounds. Edges and corners count as inside. A determinant of
/// exactly zero (ray parallel to the triangle's plane) or any non-finite
/// intermediate is a miss.
pub fn intersect(corners: [Vec3; 3], ray: &Ray) -> Option<TriangleHit> {
    let [v0, v1, v2] = corners;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);

    // Ray is parallel to triangle
    if det == 0.0 || !det.is_finite() {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Check if intersection is outside triangle (u parameter)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Check if intersection is outside triangle (v parameter)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    t.is_finite().then_some(TriangleHit { t, u, v })
}

/// Unit normal of the triangle's plane, following its winding.
pub fn geometric_normal(corners: [Vec3; 3]) -> Vec3 {
    let [v0, v1, v2] = corners;
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}
