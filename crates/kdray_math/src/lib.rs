//! Geometric building blocks shared by the kdray crates.
//!
//! Vector and matrix types come straight from `glam`; this crate adds the
//! ray tracing specific pieces on top: parametric intervals, axis-aligned
//! boxes with the split/area operations the kd-tree builder needs, and rays
//! that carry their own valid `[near, far]` range.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use axis::Axis;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_indexing_matches_axes() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[Axis::X.index()], 1.0);
        assert_eq!(v[Axis::Y.index()], 2.0);
        assert_eq!(v[Axis::Z.index()], 3.0);
    }
}
