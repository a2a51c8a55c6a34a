//! Ray intersection with flat shapes: bounded planes and disks.
//!
//! Both are parametrised by two edge vectors from the origin. The ray is
//! solved against the infinite plane they span and the resulting
//! coordinates `(alpha, beta)` along the edges decide whether the hit lies
//! on the shape.

use kdray_core::{Disk, Plane};
use kdray_math::{Ray, Vec3};

use crate::candidates::Candidates;

/// Intersection with the plane spanned by `edge1` and `edge2`.
///
/// Returns `(t, alpha, beta)` with `ray.at(t) = alpha * edge1 + beta * edge2`,
/// or `None` when the ray runs parallel to the plane or the edges are
/// degenerate.
pub fn solve(edge1: Vec3, edge2: Vec3, ray: &Ray) -> Option<(f32, f32, f32)> {
    let normal = edge1.cross(edge2);
    let denom = ray.direction.dot(normal);
    let area2 = normal.length_squared();
    if denom == 0.0 || area2 == 0.0 {
        return None;
    }

    let t = -ray.origin.dot(normal) / denom;
    if !t.is_finite() {
        return None;
    }

    let p = ray.at(t);
    let alpha = p.cross(edge2).dot(normal) / area2;
    let beta = edge1.cross(p).dot(normal) / area2;
    Some((t, alpha, beta))
}

/// Parallelogram `alpha, beta ∈ [0, 1]`, normal `edge1 × edge2`.
pub fn intersect_plane(plane: &Plane, ray: &Ray) -> Candidates {
    match solve(plane.edge1, plane.edge2, ray) {
        Some((t, alpha, beta)) if (0.0..=1.0).contains(&alpha) && (0.0..=1.0).contains(&beta) => {
            Candidates::one(t, plane.edge1.cross(plane.edge2).normalize())
        }
        _ => Candidates::NONE,
    }
}

/// Disk in the z = 0 plane, normal +z.
pub fn intersect_disk(disk: &Disk, ray: &Ray) -> Candidates {
    match solve(Vec3::X, Vec3::Y, ray) {
        Some((t, alpha, beta)) if alpha * alpha + beta * beta <= disk.radius * disk.radius => {
            Candidates::one(t, Vec3::Z)
        }
        _ => Candidates::NONE,
    }
}
