//! Direct-light response of materials and reflection directions.

use kdray_core::{Colour, Light, Material, ShadingModel};
use kdray_math::Vec3;
use rand::{Rng, RngCore};

/// Light reflected toward the viewer by one unoccluded light sample.
///
/// `view_dir` points from the surface toward the viewer and `light_dir`
/// toward the light; both are unit length, as is `normal`.
pub fn evaluate(light: &Light, material: &Material, view_dir: Vec3, light_dir: Vec3, normal: Vec3) -> Colour {
    let radiance = light.colour() * light.intensity();
    shade(&radiance, material, view_dir, light_dir, normal)
}

fn shade(radiance: &Colour, material: &Material, view_dir: Vec3, light_dir: Vec3, normal: Vec3) -> Colour {
    match &material.model {
        ShadingModel::Diffuse => lambert(radiance, material, light_dir, normal),
        ShadingModel::Phong => {
            lambert(radiance, material, light_dir, normal) + blinn(radiance, material, view_dir, light_dir, normal)
        }
        ShadingModel::Combined(parts) => parts
            .iter()
            .map(|(weight, part)| *weight * shade(radiance, part, view_dir, light_dir, normal))
            .sum(),
    }
}

fn lambert(radiance: &Colour, material: &Material, light_dir: Vec3, normal: Vec3) -> Colour {
    material.diffuse_colour * *radiance * normal.dot(light_dir).max(0.0)
}

fn blinn(radiance: &Colour, material: &Material, view_dir: Vec3, light_dir: Vec3, normal: Vec3) -> Colour {
    // No highlight from lights behind the surface.
    if normal.dot(light_dir) <= 0.0 {
        return Colour::ZERO;
    }
    let half = (view_dir + light_dir).normalize_or_zero();
    let strength = normal.dot(half).max(0.0).powf(material.shininess);
    material.specular_colour * *radiance * strength
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// A mirror direction jittered sideways by up to `glossiness` along two
/// tangents perpendicular to it.
pub fn glossy_direction(mirror: Vec3, glossiness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let w = mirror.normalize_or_zero();
    if w == Vec3::ZERO {
        return mirror;
    }
    let (u, v) = w.any_orthonormal_pair();
    let du = (rng.gen::<f32>() - 0.5) * glossiness;
    let dv = (rng.gen::<f32>() - 0.5) * glossiness;
    (w + du * u + dv * v).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white_light() -> Light {
        Light::point(Vec3::new(0.0, 0.0, 10.0), Colour::ONE, 1.0)
    }

    #[test]
    fn test_diffuse_follows_cosine() {
        let m = Material::diffuse("grey", Colour::splat(0.5));
        let head_on = evaluate(&white_light(), &m, Vec3::Z, Vec3::Z, Vec3::Z);
        assert!((head_on - Colour::splat(0.5)).length() < 1e-6);

        let slanted = Vec3::new(1.0, 0.0, 1.0).normalize();
        let c = evaluate(&white_light(), &m, Vec3::Z, slanted, Vec3::Z);
        assert!((c.x - 0.5 * slanted.z).abs() < 1e-6);

        let behind = evaluate(&white_light(), &m, Vec3::Z, -Vec3::Z, Vec3::Z);
        assert_eq!(behind, Colour::ZERO);
    }

    #[test]
    fn test_phong_adds_highlight() {
        let diffuse = Material::diffuse("d", Colour::splat(0.5));
        let phong = Material::phong("p", Colour::splat(0.5), Colour::ONE, 16.0);

        // Mirror configuration: half vector equals the normal.
        let d = evaluate(&white_light(), &diffuse, Vec3::Z, Vec3::Z, Vec3::Z);
        let p = evaluate(&white_light(), &phong, Vec3::Z, Vec3::Z, Vec3::Z);
        assert!((p - d - Colour::ONE).length() < 1e-5);

        // Away from the mirror direction the highlight falls off.
        let view = Vec3::new(1.0, 0.0, 0.2).normalize();
        let off = evaluate(&white_light(), &phong, view, Vec3::Z, Vec3::Z);
        assert!(off.x - d.x < 0.5);
    }

    #[test]
    fn test_combined_weights_parts() {
        let red = Material::diffuse("red", Colour::new(1.0, 0.0, 0.0));
        let blue = Material::diffuse("blue", Colour::new(0.0, 0.0, 1.0));
        let mix = Material::combined("mix", vec![(0.25, red), (0.75, blue)]);

        let c = evaluate(&white_light(), &mix, Vec3::Z, Vec3::Z, Vec3::Z);
        assert!((c - Colour::new(0.25, 0.0, 0.75)).length() < 1e-6);
    }

    #[test]
    fn test_light_colour_and_intensity_scale() {
        let m = Material::diffuse("white", Colour::ONE);
        let light = Light::point(Vec3::Z, Colour::new(1.0, 0.5, 0.0), 2.0);
        let c = evaluate(&light, &m, Vec3::Z, Vec3::Z, Vec3::Z);
        assert!((c - Colour::new(2.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_glossy_direction_stays_near_mirror() {
        let mut rng = StdRng::seed_from_u64(7);
        let mirror = Vec3::new(0.0, 1.0, 1.0).normalize();
        for _ in 0..100 {
            let d = glossy_direction(mirror, 0.2, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-5);
            assert!(d.dot(mirror) > 0.98);
        }
        let d = glossy_direction(mirror, 0.0, &mut rng);
        assert!((d - mirror).length() < 1e-6);
    }
}
