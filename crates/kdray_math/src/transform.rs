// Transform utilities for Mat4
//
// glam already provides transform_point3(), transform_vector3() and inverse().
// What it lacks is the normal transform and box transform the scene needs.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Carry an object-space normal into world space.
    ///
    /// `self` must be the world-to-object (inverse) matrix. Normals transform
    /// by the transpose of that inverse, which keeps them perpendicular to
    /// the surface under non-uniform scale. The result is unit length.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.transpose().transform_vector3(normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        Aabb::enclosing(aabb.corners().map(|corner| self.transform_point3(corner)))
    }
}
