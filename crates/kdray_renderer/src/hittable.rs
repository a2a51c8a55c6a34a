//! Ray/scene intersection.
//!
//! Each surface is culled by its world-space box, then the ray is carried
//! into the surface's object space and handed to the routine for its shape.
//! The box only accepts or rejects: the exact test always runs over the
//! ray's own `[near, far]`. Object-space `t` values equal world-space ones
//! because ray directions are never renormalised on the way.

use kdray_core::{Scene, Shape, Surface};
use kdray_math::{Mat4Ext, Ray, Vec3};

use crate::candidates::Candidates;
use crate::error::{TraceError, TraceResult};
use crate::{cone, cylinder, kdtree, planar, sphere};

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub surface: &'a Surface,
    /// World-space point of intersection
    pub position: Vec3,
    /// World-space outward unit normal
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
}

/// Something a ray can be tested against.
pub trait Hittable {
    /// Nearest hit within the ray's `[near, far]` bounds.
    fn hit(&self, ray: &Ray) -> TraceResult<Option<Hit<'_>>>;
}

/// Nearest hit on `shape` for an object-space ray, as `(t, normal)`.
pub fn intersect_shape(shape: &Shape, ray: &Ray) -> TraceResult<Option<(f32, Vec3)>> {
    let candidates: Candidates = match shape {
        Shape::Sphere(s) => sphere::intersect(s, ray),
        Shape::Cylinder(c) => cylinder::intersect(c, ray),
        Shape::Cone(c) => cone::intersect(c, ray),
        Shape::Disk(d) => planar::intersect_disk(d, ray),
        Shape::Plane(p) => planar::intersect_plane(p, ray),
        Shape::Mesh(mesh) => return Ok(kdtree::intersect_mesh(mesh, ray)),
        Shape::Torus(_) => {
            return Err(TraceError::UnsupportedShape { shape: shape.kind() });
        }
    };
    Ok(candidates.nearest_within(ray.bounds()))
}

impl Hittable for Surface {
    fn hit(&self, ray: &Ray) -> TraceResult<Option<Hit<'_>>> {
        if self.bounds().clip(ray, ray.bounds()).is_none() {
            return Ok(None);
        }

        let local = ray.transform(&self.world_to_model);
        let Some((t, normal)) = intersect_shape(&self.shape, &local)? else {
            return Ok(None);
        };

        Ok(Some(Hit {
            surface: self,
            position: ray.at(t),
            normal: self.world_to_model.transform_normal(normal),
            t,
        }))
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray) -> TraceResult<Option<Hit<'_>>> {
        if ray.is_degenerate() {
            return Ok(None);
        }

        let mut closest: Option<Hit<'_>> = None;
        for surface in &self.surfaces {
            let far = closest.map_or(ray.far, |h| h.t);
            let bounded = ray.with_bounds(ray.near, far);
            if let Some(hit) = surface.hit(&bounded)? {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(hit);
                }
            }
        }
        Ok(closest)
    }
}
