//! Light sources.

use kdray_math::{Vec2, Vec3};

use crate::material::Colour;

/// A light in world space.
#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    /// Emits equally in all directions from one point.
    Point {
        position: Vec3,
        colour: Colour,
        intensity: f32,
    },

    /// Infinitely far away; `direction` is the way the light travels.
    Directional {
        direction: Vec3,
        colour: Colour,
        intensity: f32,
    },

    /// A point light limited to a cone around `direction`.
    Spot {
        position: Vec3,
        direction: Vec3,
        /// Half-angle of the cone, in degrees
        angle: f32,
        colour: Colour,
        intensity: f32,
    },

    /// A parallelogram with one corner at `position`, spanned by two edges.
    Area {
        position: Vec3,
        edge1: Vec3,
        edge2: Vec3,
        colour: Colour,
        intensity: f32,
    },
}

/// Where to aim a shadow ray for one light sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the shaded point toward the light
    pub direction: Vec3,
    /// Distance to the sampled light position (infinite for directional)
    pub distance: f32,
}

impl Light {
    pub fn point(position: Vec3, colour: Colour, intensity: f32) -> Self {
        Light::Point {
            position,
            colour,
            intensity,
        }
    }

    pub fn directional(direction: Vec3, colour: Colour, intensity: f32) -> Self {
        Light::Directional {
            direction,
            colour,
            intensity,
        }
    }

    pub fn spot(position: Vec3, direction: Vec3, angle: f32, colour: Colour, intensity: f32) -> Self {
        Light::Spot {
            position,
            direction,
            angle,
            colour,
            intensity,
        }
    }

    pub fn area(position: Vec3, edge1: Vec3, edge2: Vec3, colour: Colour, intensity: f32) -> Self {
        Light::Area {
            position,
            edge1,
            edge2,
            colour,
            intensity,
        }
    }

    pub fn colour(&self) -> Colour {
        match self {
            Light::Point { colour, .. }
            | Light::Directional { colour, .. }
            | Light::Spot { colour, .. }
            | Light::Area { colour, .. } => *colour,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Point { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Spot { intensity, .. }
            | Light::Area { intensity, .. } => *intensity,
        }
    }

    /// Side of the stratified sample grid: `shadow_samples` for area
    /// lights, 1 for everything else.
    pub fn grid_size(&self, shadow_samples: u32) -> u32 {
        match self {
            Light::Area { .. } => shadow_samples.max(1),
            _ => 1,
        }
    }

    /// Sample the light as seen from `point`.
    ///
    /// `cell` picks the stratum `(p, q)` of an `n × n` grid and `jitter`
    /// (in `[0, 1)²`) the position inside it; both only matter for area
    /// lights. Returns `None` when the light cannot reach `point` at all.
    pub fn sample(&self, point: Vec3, cell: (u32, u32), n: u32, jitter: Vec2) -> Option<LightSample> {
        match self {
            Light::Point { position, .. } => towards(point, *position),
            Light::Directional { direction, .. } => {
                let direction = -direction.normalize_or_zero();
                (direction != Vec3::ZERO).then_some(LightSample {
                    direction,
                    distance: f32::INFINITY,
                })
            }
            Light::Spot {
                position,
                direction,
                angle,
                ..
            } => {
                let sample = towards(point, *position)?;
                let axis = direction.normalize_or_zero();
                let cos_cutoff = angle.to_radians().cos();
                ((-sample.direction).dot(axis) >= cos_cutoff).then_some(sample)
            }
            Light::Area {
                position,
                edge1,
                edge2,
                ..
            } => {
                let n = n.max(1) as f32;
                let alpha = (cell.0 as f32 + jitter.x) / n;
                let beta = (cell.1 as f32 + jitter.y) / n;
                towards(point, *position + *edge1 * alpha + *edge2 * beta)
            }
        }
    }
}

fn towards(from: Vec3, to: Vec3) -> Option<LightSample> {
    let offset = to - from;
    let distance = offset.length();
    (distance > 0.0 && distance.is_finite()).then(|| LightSample {
        direction: offset / distance,
        distance,
    })
}
