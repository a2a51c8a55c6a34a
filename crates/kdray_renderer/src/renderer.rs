//! Recursive Whitted-style renderer.
//!
//! Implements:
//! - Direct lighting with shadow rays and stratified area-light sampling
//! - Mirror and glossy reflection with a hard recursion limit
//! - Anti-aliasing via a jittered sub-pixel grid
//! - Gamma correction on output

use std::time::Instant;

use kdray_core::{Colour, Light, Scene};
use kdray_math::{Ray, Vec2, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::error::TraceResult;
use crate::hittable::{Hit, Hittable};
use crate::material::{evaluate, glossy_direction, reflect};

/// Start of a shadow ray's span, keeping it off the surface it leaves.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Distance along the normal that reflection rays start from.
pub const REFLECT_EPSILON: f32 = 1e-3;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Trace a jittered `aa_samples × aa_samples` grid per pixel
    pub antialiasing: bool,
    pub aa_samples: u32,
    /// Side of the sample grid over each area light
    pub shadow_samples: u32,
    /// Number of ray levels, counting the primary ray
    pub max_depth: u32,
    /// Perturbed rays per glossy reflection
    pub gloss_samples: u32,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            antialiasing: false,
            aa_samples: 2,
            shadow_samples: 3,
            max_depth: 5,
            gloss_samples: 8,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Same configuration with every sample count and size at least 1.
    pub fn sanitized(mut self) -> Self {
        for (name, value) in [
            ("width", &mut self.width),
            ("height", &mut self.height),
            ("aa_samples", &mut self.aa_samples),
            ("shadow_samples", &mut self.shadow_samples),
            ("gloss_samples", &mut self.gloss_samples),
            ("bucket_size", &mut self.bucket_size),
        ] {
            if *value == 0 {
                log::warn!("{name} must be at least 1, using 1");
                *value = 1;
            }
        }
        self
    }
}

/// Compute the colour seen along a ray.
///
/// `depth` is the level of `ray` in the ray tree, 0 for primary rays. Once
/// it reaches `config.max_depth` the scene background is returned without
/// tracing anything.
pub fn ray_colour(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> TraceResult<Colour> {
    if depth >= config.max_depth {
        return Ok(scene.background);
    }

    let Some(hit) = scene.hit(ray)? else {
        return Ok(miss_colour(scene, ray));
    };

    let view_dir = (-ray.direction).normalize();
    let normal = if hit.normal.dot(view_dir) < 0.0 {
        -hit.normal
    } else {
        hit.normal
    };

    let mut colour = direct_light(scene, &hit, view_dir, normal, config, rng)?;

    let material = &hit.surface.material;
    if material.is_reflective() {
        let reflected = reflection(ray, scene, &hit, normal, depth, config, rng)?;
        colour += material.reflectivity * material.specular_colour * reflected;
    }

    Ok(colour)
}

fn miss_colour(scene: &Scene, ray: &Ray) -> Colour {
    match &scene.environment {
        Some(environment) => environment.sample(ray.direction.normalize()),
        None => scene.background,
    }
}

/// Sum of every light's unoccluded contribution at a hit.
fn direct_light(
    scene: &Scene,
    hit: &Hit<'_>,
    view_dir: Vec3,
    normal: Vec3,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> TraceResult<Colour> {
    let material = &hit.surface.material;
    let mut total = Colour::ZERO;

    for light in &scene.lights {
        let n = light.grid_size(config.shadow_samples);
        let jittered = matches!(light, Light::Area { .. });
        let mut sum = Colour::ZERO;

        for p in 0..n {
            for q in 0..n {
                let jitter = if jittered {
                    Vec2::new(rng.gen(), rng.gen())
                } else {
                    Vec2::splat(0.5)
                };
                let Some(sample) = light.sample(hit.position, (p, q), n, jitter) else {
                    continue;
                };

                let shadow = Ray::new(hit.position, sample.direction).with_bounds(SHADOW_EPSILON, sample.distance);
                if scene.hit(&shadow)?.is_some() {
                    continue;
                }

                sum += evaluate(light, material, view_dir, sample.direction, normal);
            }
        }

        total += sum / (n * n) as f32;
    }

    Ok(total)
}

/// Colour arriving along the reflection of `ray` at `hit`.
///
/// Glossy materials average several perturbed rays, but only for the
/// primary ray and its first bounce; deeper levels follow the mirror ray.
fn reflection(
    ray: &Ray,
    scene: &Scene,
    hit: &Hit<'_>,
    normal: Vec3,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> TraceResult<Colour> {
    let material = &hit.surface.material;
    let origin = hit.position + REFLECT_EPSILON * normal;
    let mirror = reflect(ray.direction.normalize(), normal);

    if !material.is_glossy() || depth > 1 {
        return ray_colour(&Ray::new(origin, mirror), scene, depth + 1, config, rng);
    }

    let samples = config.gloss_samples.max(1);
    let mut sum = Colour::ZERO;
    for _ in 0..samples {
        let mut direction = glossy_direction(mirror, material.glossiness, rng);
        // Never send a reflection into the surface.
        if direction.dot(normal) <= 0.0 {
            direction = mirror;
        }
        sum += ray_colour(&Ray::new(origin, direction), scene, depth + 1, config, rng)?;
    }
    Ok(sum / samples as f32)
}

/// Render a single pixel, averaging a jittered grid when anti-aliasing.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> TraceResult<Colour> {
    if !config.antialiasing {
        let ray = camera.generate(x, y, Vec2::splat(0.5));
        return ray_colour(&ray, scene, 0, config, rng);
    }

    let n = config.aa_samples.max(1);
    let mut pixel_colour = Colour::ZERO;
    for i in 0..n {
        for j in 0..n {
            let offset = Vec2::new(
                (i as f32 + rng.gen::<f32>()) / n as f32,
                (j as f32 + rng.gen::<f32>()) / n as f32,
            );
            let ray = camera.generate(x, y, offset);
            pixel_colour += ray_colour(&ray, scene, 0, config, rng)?;
        }
    }

    // Average the samples
    Ok(pixel_colour / (n * n) as f32)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a colour to 8-bit RGBA.
pub fn colour_to_rgba(colour: Colour) -> [u8; 4] {
    let channel = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [channel(colour.x), channel(colour.y), channel(colour.z), 255]
}

/// Linear colours of a rendered image, row-major from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Colour>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Colour::ZERO; width as usize * height as usize],
        }
    }

    /// Position of (x, y) in `pixels`, computed in `usize` so large frames
    /// cannot overflow `u32`.
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Colour {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        let i = self.index(x, y);
        self.pixels[i] = colour;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        for (i, colour) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(b.x + i % b.width, b.y + i / b.width, *colour);
        }
    }

    /// Convert to RGBA bytes for saving.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| colour_to_rgba(*c)).collect()
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded: buckets are traced in spiral order and every pixel is
/// finished before the next one starts. The image takes its size from the
/// camera.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig, rng: &mut dyn RngCore) -> TraceResult<ImageBuffer> {
    let config = config.clone().sanitized();
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} ({} surfaces, {} lights, max depth {})",
        camera.width,
        camera.height,
        scene.surface_count(),
        scene.lights.len(),
        config.max_depth
    );

    let mut image = ImageBuffer::new(camera.width, camera.height);
    let buckets = generate_buckets(camera.width, camera.height, config.bucket_size);
    let total = buckets.len();

    for bucket in &buckets {
        let result = render_bucket(bucket, scene, camera, &config, rng)?;
        image.write_bucket(&result);
        log::debug!("Bucket {}/{} done at ({}, {})", bucket.index + 1, total, bucket.x, bucket.y);
    }

    log::info!("Rendered {} buckets in {:.2?}", total, start.elapsed());
    Ok(image)
}
