//! Scene description for kdray.
//!
//! A scene is a flat list of surfaces plus the lights and background that
//! shade them. Everything here is built once before rendering and only
//! read afterwards, so a scene can be shared freely between pixels.

use std::sync::Arc;

use kdray_math::{Aabb, Mat4, Quat, Vec3};

use crate::environment::EnvironmentMap;
use crate::light::Light;
use crate::material::{Colour, Material};
use crate::shape::Shape;

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// The exact inverse, composed from the inverted components rather
    /// than by inverting the matrix.
    pub fn to_inverse_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale.recip())
            * Mat4::from_quat(self.rotation.inverse())
            * Mat4::from_translation(-self.translation)
    }
}

/// A shape placed in the world with a material.
#[derive(Clone, Debug)]
pub struct Surface {
    pub shape: Arc<Shape>,
    pub material: Arc<Material>,

    /// Object space to world space
    pub model_to_world: Mat4,

    /// World space to object space; always the inverse of `model_to_world`
    pub world_to_model: Mat4,

    /// World-space box, computed once
    bounds: Aabb,
}

impl Surface {
    /// Place a shape using a matrix and its inverse.
    ///
    /// The inverse is taken as given. Callers that build the transform from
    /// components already know it exactly.
    pub fn new(shape: Arc<Shape>, material: Arc<Material>, model_to_world: Mat4, world_to_model: Mat4) -> Self {
        let bounds = shape.world_bounds(&model_to_world);
        Self {
            shape,
            material,
            model_to_world,
            world_to_model,
            bounds,
        }
    }

    /// Place a shape with a scale/rotate/translate transform.
    pub fn from_transform(shape: Arc<Shape>, material: Arc<Material>, transform: &Transform) -> Self {
        Self::new(shape, material, transform.to_matrix(), transform.to_inverse_matrix())
    }

    /// Place a shape at the origin of the world.
    pub fn untransformed(shape: Arc<Shape>, material: Arc<Material>) -> Self {
        Self::new(shape, material, Mat4::IDENTITY, Mat4::IDENTITY)
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// A complete scene: surfaces, lights and what lies beyond them.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub surfaces: Vec<Surface>,
    pub lights: Vec<Light>,

    /// Colour of rays that escape, and of paths cut off by the depth limit
    pub background: Colour,

    /// Looked up instead of `background` for escaping rays, when set
    pub environment: Option<Arc<dyn EnvironmentMap>>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(background: Colour) -> Self {
        Self {
            background,
            ..Default::default()
        }
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentMap>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Get surface count.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Get total triangle count across all mesh surfaces.
    pub fn total_triangle_count(&self) -> usize {
        self.surfaces
            .iter()
            .map(|s| match s.shape.as_ref() {
                Shape::Mesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, Triangle};
    use crate::shape::Sphere;

    fn sphere() -> Arc<Shape> {
        Arc::new(Shape::Sphere(Sphere { radius: 1.0 }))
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new(Colour::splat(0.1));
        let grey = Arc::new(Material::default());

        let mesh = Mesh::new(
            "triangle",
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![],
            vec![],
            vec![Triangle::new([0, 1, 2])],
        )
        .unwrap();
        let mesh = Arc::new(Shape::Mesh(mesh));

        scene.add_surface(Surface::untransformed(mesh.clone(), grey.clone()));
        scene.add_surface(Surface::from_transform(
            mesh,
            grey.clone(),
            &Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        ));
        scene.add_surface(Surface::untransformed(sphere(), grey));
        scene.add_light(Light::point(Vec3::Y * 5.0, Colour::ONE, 1.0));

        assert_eq!(scene.surface_count(), 3);
        assert_eq!(scene.total_triangle_count(), 2);
        assert_eq!(scene.lights.len(), 1);
        assert!(scene.environment.is_none());
    }

    #[test]
    fn test_transform_inverse_matches_glam() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4))
            .with_scale(Vec3::new(2.0, 0.5, 3.0));

        let product = transform.to_matrix() * transform.to_inverse_matrix();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));

        let expected = transform.to_matrix().inverse();
        assert!(transform.to_inverse_matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_surface_bounds_follow_transform() {
        let grey = Arc::new(Material::default());
        let mut scene = Scene::default();
        scene.add_surface(Surface::from_transform(
            sphere(),
            grey.clone(),
            &Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        ));
        scene.add_surface(Surface::from_transform(
            sphere(),
            grey,
            &Transform::from_translation(Vec3::new(-5.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)),
        ));

        let first = scene.surfaces[0].bounds();
        assert!((first.min() - Vec3::new(4.0, -1.0, -1.0)).length() < 1e-3);
        assert!((first.max() - Vec3::new(6.0, 1.0, 1.0)).length() < 1e-3);

        let second = scene.surfaces[1].bounds();
        assert!((second.min() - Vec3::new(-7.0, -2.0, -2.0)).length() < 1e-3);
        assert!((second.max() - Vec3::new(-3.0, 2.0, 2.0)).length() < 1e-3);
    }
}
