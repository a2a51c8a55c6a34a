//! Environment lookups for rays that leave the scene.

use kdray_math::Vec3;

use crate::material::Colour;

/// Colour seen along a direction that hits nothing.
///
/// Implementations are shared between the scene and the renderer, so they
/// must be thread-safe.
pub trait EnvironmentMap: Send + Sync + std::fmt::Debug {
    fn sample(&self, direction: Vec3) -> Colour;
}

/// The same colour in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformEnvironment(pub Colour);

impl EnvironmentMap for UniformEnvironment {
    fn sample(&self, _direction: Vec3) -> Colour {
        self.0
    }
}

/// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub horizon: Colour,
    pub zenith: Colour,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Colour::new(1.0, 1.0, 1.0),
            zenith: Colour::new(0.5, 0.7, 1.0),
        }
    }
}

impl EnvironmentMap for SkyGradient {
    fn sample(&self, direction: Vec3) -> Colour {
        let unit_direction = direction.normalize_or_zero();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}
