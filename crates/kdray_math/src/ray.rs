use crate::{Interval, Mat4, Vec3};

/// A ray in 3D space with an origin, a direction and a valid `[near, far]` span.
///
/// The direction is not required to be unit length. Keeping it unnormalised
/// is what lets [`Ray::transform`] move a ray between world and object space
/// without changing the meaning of its `t` values: a hit at `t` in object
/// space is the hit at the same `t` in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Ray {
    /// Create a new ray valid over `[0, +inf]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Same ray with its valid span replaced.
    pub fn with_bounds(self, near: f32, far: f32) -> Self {
        Self { near, far, ..self }
    }

    /// The valid span as an interval.
    #[inline]
    pub fn bounds(&self) -> Interval {
        Interval::new(self.near, self.far)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine transform.
    ///
    /// The origin is transformed as a point and the direction as a vector
    /// (no translation, no renormalisation), so the span carries over.
    pub fn transform(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
            near: self.near,
            far: self.far,
        }
    }

    /// True when the direction has no length and the ray cannot hit anything.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let len_sq = self.direction.length_squared();
        len_sq == 0.0 || !len_sq.is_finite()
    }
}
