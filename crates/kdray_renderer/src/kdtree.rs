//! Nearest-hit search through a mesh's kd-tree.
//!
//! At every split plane the ray crosses, the child on the origin's side is
//! searched first. Spans only decide which children to visit; leaves accept
//! any hit within the ray's own `[near, far]`, so a triangle lying on a
//! split plane is found whichever way its `t` rounds.

use kdray_core::{KdNode, Mesh, Triangle};
use kdray_math::{Interval, Ray, Vec3};

use crate::triangle::{self, TriangleHit};

/// Relative tolerance on the plane crossing `t` when pruning a child.
const PLANE_SLACK: f32 = 1e-5;

/// A triangle hit together with the triangle it came from.
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    pub triangle: Triangle,
    pub hit: TriangleHit,
}

/// Nearest hit within the ray's bounds, with the shading normal.
///
/// The normal is interpolated from vertex normals when the triangle has
/// them, and the face normal otherwise.
pub fn intersect_mesh(mesh: &Mesh, ray: &Ray) -> Option<(f32, Vec3)> {
    let found = nearest(mesh, ray)?;
    let normal = mesh
        .shading_normal(&found.triangle, found.hit.u, found.hit.v)
        .unwrap_or_else(|| triangle::geometric_normal(mesh.positions(&found.triangle)));
    Some((found.hit.t, normal))
}

/// Nearest triangle hit within the ray's bounds.
pub fn nearest(mesh: &Mesh, ray: &Ray) -> Option<MeshHit> {
    if ray.is_degenerate() {
        return None;
    }
    let span = mesh.bounds().with_rounding_margin().clip(ray, ray.bounds())?;
    traverse(mesh, mesh.kd_tree(), ray, span)
}

fn traverse(mesh: &Mesh, node: &KdNode, ray: &Ray, span: Interval) -> Option<MeshHit> {
    match node {
        KdNode::Leaf { triangles } => nearest_in_leaf(mesh, triangles, ray),
        KdNode::Internal {
            axis,
            location,
            left,
            right,
        } => {
            let origin = axis.of(ray.origin);
            let dir = axis.of(ray.direction);

            // Never crosses the plane: stay on the origin's side.
            if dir == 0.0 {
                let side = if origin <= *location { left } else { right };
                return traverse(mesh, side, ray, span);
            }

            let (near, far) = if dir > 0.0 { (left, right) } else { (right, left) };
            let clip_t = (location - origin) / dir;
            let slack = PLANE_SLACK * (1.0 + clip_t.abs() + (location.abs() + origin.abs()) / dir.abs());

            if clip_t > span.max + slack {
                traverse(mesh, near, ray, span)
            } else if clip_t < span.min - slack {
                traverse(mesh, far, ray, span)
            } else {
                let (near_span, far_span) = span.split_at(clip_t);
                let near_hit = traverse(mesh, near, ray, near_span);
                if let Some(found) = near_hit {
                    if found.hit.t <= clip_t {
                        return near_hit;
                    }
                }
                closer(near_hit, traverse(mesh, far, ray, far_span))
            }
        }
    }
}

fn closer(a: Option<MeshHit>, b: Option<MeshHit>) -> Option<MeshHit> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.hit.t < a.hit.t { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn nearest_in_leaf(mesh: &Mesh, triangles: &[Triangle], ray: &Ray) -> Option<MeshHit> {
    let bounds = ray.bounds();
    let mut best: Option<MeshHit> = None;
    for tri in triangles {
        let Some(hit) = triangle::intersect(mesh.positions(tri), ray) else {
            continue;
        };
        if bounds.contains(hit.t) && best.map_or(true, |b| hit.t < b.hit.t) {
            best = Some(MeshHit { triangle: *tri, hit });
        }
    }
    best
}
