//! Pinhole camera for ray generation.

use kdray_math::{Ray, Vec2, Vec3};

/// A pinhole camera looking along `direction`.
///
/// Everything is computed up front, so generating a ray is a pure function
/// of the pixel and the sub-pixel offset.
#[derive(Debug, Clone)]
pub struct Camera {
    pub width: u32,
    pub height: u32,

    center: Vec3,
    pixel00_corner: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Build a camera at `position` looking along `direction`.
    ///
    /// `fovy` is the vertical field of view in degrees. `up` only needs to
    /// be roughly perpendicular to `direction`.
    pub fn new(position: Vec3, direction: Vec3, up: Vec3, fovy: f32, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        // Calculate viewport dimensions at unit distance
        let h = (fovy.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (width as f32 / height as f32);

        // Calculate camera basis vectors
        let w = -direction.normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let viewport_upper_left = position - w - viewport_u / 2.0 - viewport_v / 2.0;

        Self {
            width,
            height,
            center: position,
            pixel00_corner: viewport_upper_left,
            pixel_delta_u: viewport_u / width as f32,
            pixel_delta_v: viewport_v / height as f32,
        }
    }

    /// Primary ray through pixel `(x, y)`, row 0 at the top.
    ///
    /// `offset` is the position inside the pixel, `(0.5, 0.5)` for its
    /// centre. The ray spans `[0, ∞)` and is not normalised.
    pub fn generate(&self, x: u32, y: u32, offset: Vec2) -> Ray {
        let pixel_sample = self.pixel00_corner
            + (x as f32 + offset.x) * self.pixel_delta_u
            + (y as f32 + offset.y) * self.pixel_delta_v;
        Ray::new(self.center, pixel_sample - self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, Vec3::Y, 90.0, 100, 100)
    }

    #[test]
    fn test_centre_ray_looks_forward() {
        let ray = camera().generate(50, 50, Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction.normalize() - -Vec3::Z).length() < 1e-5);
        assert_eq!(ray.near, 0.0);
        assert_eq!(ray.far, f32::INFINITY);
    }

    #[test]
    fn test_image_orientation() {
        let cam = camera();

        // Top-left corner of the image is up and to the left.
        let corner = cam.generate(0, 0, Vec2::ZERO);
        assert!((corner.direction - Vec3::new(-1.0, 1.0, -1.0)).length() < 1e-5);

        // Rows grow downward, columns to the right.
        let lower = cam.generate(50, 90, Vec2::splat(0.5));
        assert!(lower.direction.y < 0.0);
        let right = cam.generate(90, 50, Vec2::splat(0.5));
        assert!(right.direction.x > 0.0);
    }

    #[test]
    fn test_generate_is_pure() {
        let cam = camera();
        let a = cam.generate(13, 71, Vec2::new(0.25, 0.75));
        let b = cam.generate(13, 71, Vec2::new(0.25, 0.75));
        assert_eq!(a, b);
    }

    #[test]
    fn test_aspect_ratio() {
        let cam = Camera::new(Vec3::ZERO, -Vec3::Z, Vec3::Y, 90.0, 200, 100);
        let corner = cam.generate(0, 0, Vec2::ZERO);
        assert!((corner.direction - Vec3::new(-2.0, 1.0, -1.0)).length() < 1e-5);
    }
}
