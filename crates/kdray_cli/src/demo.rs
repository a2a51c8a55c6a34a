//! The built-in demo scene.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use kdray_core::{
    Colour, Cone, Cylinder, Disk, Light, Material, Mesh, Plane, Scene, Shape, Sphere, Surface, Transform,
};
use kdray_math::{Quat, Vec3};

/// A floor with a mirror ball, a cylinder, a cone and a disk, lit by one
/// point light and one area light. `mesh` is placed in front when given.
pub fn build(mesh: Option<Mesh>) -> Scene {
    let mut scene = Scene::new(Colour::splat(0.05));

    // Quadrics are modelled along +z; stand them up along +y.
    let upright = Quat::from_rotation_x(-FRAC_PI_2);

    let floor = Material::diffuse("floor", Colour::new(0.6, 0.6, 0.55)).with_reflectivity(0.15);
    scene.add_surface(place(
        Shape::Plane(Plane {
            edge1: Vec3::new(20.0, 0.0, 0.0),
            edge2: Vec3::new(0.0, 0.0, -20.0),
        }),
        floor,
        Transform::from_translation(Vec3::new(-10.0, -1.0, 10.0)),
    ));

    let mut chrome = Material::phong("chrome", Colour::splat(0.05), Colour::splat(0.9), 128.0).with_reflectivity(0.8);
    chrome.specular_colour = Colour::new(0.9, 0.9, 1.0);
    scene.add_surface(place(
        Shape::Sphere(Sphere { radius: 1.0 }),
        chrome,
        Transform::default(),
    ));

    scene.add_surface(place(
        Shape::Cylinder(Cylinder {
            radius: 0.6,
            height: 1.5,
            capped: true,
        }),
        Material::phong("red", Colour::new(0.7, 0.1, 0.1), Colour::splat(0.5), 32.0),
        Transform::from_translation(Vec3::new(-2.6, -1.0, 0.5)).with_rotation(upright),
    ));

    let brushed = Material::phong("brushed", Colour::new(0.2, 0.3, 0.6), Colour::splat(0.6), 16.0)
        .with_reflectivity(0.4)
        .with_glossiness(0.15);
    scene.add_surface(place(
        Shape::Cone(Cone {
            radius: 0.7,
            height: 1.8,
            capped: true,
        }),
        brushed,
        Transform::from_translation(Vec3::new(2.6, -1.0, 0.5)).with_rotation(upright),
    ));

    let mix = Material::combined(
        "mix",
        vec![
            (0.5, Material::diffuse("green", Colour::new(0.1, 0.6, 0.2))),
            (0.5, Material::phong("white", Colour::splat(0.8), Colour::ONE, 64.0)),
        ],
    );
    scene.add_surface(place(
        Shape::Disk(Disk { radius: 1.5 }),
        mix,
        Transform::from_translation(Vec3::new(0.0, 0.6, -3.0)),
    ));

    if let Some(mesh) = mesh {
        log::info!(
            "Adding mesh '{}' ({} triangles, {} vertices)",
            mesh.name,
            mesh.triangle_count(),
            mesh.vertex_count()
        );
        log::debug!("normals: {}, texcoords: {}", mesh.has_normals(), mesh.has_texcoords());
        scene.add_surface(place(
            Shape::Mesh(mesh),
            Material::phong("mesh", Colour::new(0.8, 0.7, 0.4), Colour::splat(0.3), 24.0),
            Transform::from_translation(Vec3::new(0.0, -1.0, 2.2)),
        ));
    }

    scene.add_light(Light::point(Vec3::new(4.0, 5.0, 6.0), Colour::ONE, 0.7));
    scene.add_light(Light::area(
        Vec3::new(-1.0, 4.5, -1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
        Colour::new(1.0, 0.95, 0.9),
        0.5,
    ));

    scene
}

fn place(shape: Shape, material: Material, transform: Transform) -> Surface {
    Surface::from_transform(Arc::new(shape), Arc::new(material), &transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdray_renderer::Hittable;
    use kdray_math::Ray;

    #[test]
    fn test_demo_scene_contents() {
        let scene = build(None);
        assert_eq!(scene.surface_count(), 5);
        assert_eq!(scene.lights.len(), 2);
    }

    #[test]
    fn test_demo_quadrics_stand_on_the_floor() {
        let scene = build(None);
        // Straight down onto the cylinder's top cap at y = 0.5.
        let ray = Ray::new(Vec3::new(-2.6, 5.0, 0.5), -Vec3::Y);
        let hit = scene.hit(&ray).unwrap().unwrap();
        assert!((hit.position.y - 0.5).abs() < 1e-4);
        assert!((hit.normal - Vec3::Y).length() < 1e-4);

        // Beside everything the floor is hit.
        let ray = Ray::new(Vec3::new(6.0, 5.0, 6.0), -Vec3::Y);
        let hit = scene.hit(&ray).unwrap().unwrap();
        assert!((hit.position.y + 1.0).abs() < 1e-4);
    }
}
