//! Geometric shapes in their own object space.
//!
//! Every shape is defined around a fixed local frame; placing it in the
//! scene is the job of the owning [`Surface`](crate::scene::Surface).

use kdray_math::{Aabb, Mat4, Mat4Ext, Vec3};

use crate::mesh::Mesh;

/// Parallelogram with one corner at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub edge1: Vec3,
    pub edge2: Vec3,
}

/// Disk of `radius` around the origin in the z = 0 plane, facing +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub radius: f32,
}

/// Sphere centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

/// Cylinder along +z from z = 0 to z = `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub height: f32,
    pub capped: bool,
}

/// Cone with its base of `radius` at z = 0 and its apex at z = `height`.
///
/// Only the base can be capped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub radius: f32,
    pub height: f32,
    pub capped: bool,
}

/// Torus around the z axis: a tube of `inner_radius` swept at distance
/// `outer_radius` from the origin. Parameters only; it cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Plane(Plane),
    Disk(Disk),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Cone(Cone),
    Torus(Torus),
    Mesh(Mesh),
}

impl Shape {
    /// Short lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Plane(_) => "plane",
            Shape::Disk(_) => "disk",
            Shape::Sphere(_) => "sphere",
            Shape::Cylinder(_) => "cylinder",
            Shape::Cone(_) => "cone",
            Shape::Torus(_) => "torus",
            Shape::Mesh(_) => "mesh",
        }
    }

    /// Object-space bounding box.
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Shape::Plane(p) => Aabb::enclosing([Vec3::ZERO, p.edge1, p.edge2, p.edge1 + p.edge2]),
            Shape::Disk(d) => Aabb::from_points(
                Vec3::new(-d.radius, -d.radius, 0.0),
                Vec3::new(d.radius, d.radius, 0.0),
            ),
            Shape::Sphere(s) => Aabb::from_points(Vec3::splat(-s.radius), Vec3::splat(s.radius)),
            Shape::Cylinder(Cylinder { radius, height, .. }) | Shape::Cone(Cone { radius, height, .. }) => {
                Aabb::from_points(
                    Vec3::new(-radius, -radius, 0.0),
                    Vec3::new(*radius, *radius, *height),
                )
            }
            Shape::Torus(t) => {
                let r = t.inner_radius + t.outer_radius;
                Aabb::from_points(
                    Vec3::new(-r, -r, -t.inner_radius),
                    Vec3::new(r, r, t.inner_radius),
                )
            }
            Shape::Mesh(mesh) => mesh.bounds(),
        }
    }

    /// World-space bounding box under `model_to_world`.
    ///
    /// Meshes transform every vertex, which gives a tighter box than
    /// transforming the corners of the local one. Either way the box is
    /// grown by a rounding margin so it still encloses surface points that
    /// land on its faces.
    pub fn world_bounds(&self, model_to_world: &Mat4) -> Aabb {
        let bounds = match self {
            Shape::Mesh(mesh) => {
                Aabb::enclosing(mesh.vertices().iter().map(|v| model_to_world.transform_point3(*v)))
            }
            _ => model_to_world.transform_aabb(&self.local_bounds()),
        };
        bounds.with_rounding_margin()
    }
}
