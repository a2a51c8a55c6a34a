//! Image textures and cube maps.
//!
//! Images are decoded with the `image` crate and stored as linear RGB.
//! Texel lookups wrap `(u, v)` into the unit square and filter bilinearly,
//! with `v = 0` on the first row of the file.

use std::path::Path;
use std::sync::Arc;

use kdray_math::Vec3;
use thiserror::Error;

use crate::environment::EnvironmentMap;
use crate::material::Colour;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture '{path}': {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture '{0}' has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with linear RGB pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,

    /// Row-major, `width * height` entries
    pixels: Vec<Colour>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Colour>, path: impl Into<String>) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::Empty(path));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Create a solid colour texture (1x1).
    pub fn solid_colour(colour: Colour) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![colour],
            path: "<solid>".to_string(),
        }
    }

    /// Decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Image {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Vec3::new(srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])))
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Texture::new(width, height, pixels, path.display().to_string())
    }

    /// Bilinearly filtered texel at `(u, v)`.
    ///
    /// Coordinates wrap, except that exactly 1.0 maps to the last texel
    /// rather than back to the first.
    pub fn texel(&self, u: f32, v: f32) -> Colour {
        let u = wrap(u) * self.width as f32;
        let v = wrap(v) * self.height as f32;

        let x0 = (u.floor() as u32).min(self.width - 1);
        let y0 = (v.floor() as u32).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = u - x0 as f32;
        let fy = v - y0 as f32;

        let top = self.pixel(x0, y0) * (1.0 - fx) + self.pixel(x1, y0) * fx;
        let bottom = self.pixel(x0, y1) * (1.0 - fx) + self.pixel(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }

    fn pixel(&self, x: u32, y: u32) -> Colour {
        self.pixels[(y * self.width + x) as usize]
    }
}

fn wrap(t: f32) -> f32 {
    let t = if t == 1.0 { t - 1e-6 } else { t };
    t - t.floor()
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Faces of a cube map, in file-loading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    NegativeX,
    PositiveX,
    NegativeY,
    PositiveY,
    NegativeZ,
    PositiveZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::NegativeX,
        CubeFace::PositiveX,
        CubeFace::NegativeY,
        CubeFace::PositiveY,
        CubeFace::NegativeZ,
        CubeFace::PositiveZ,
    ];

    /// File name suffix for this face.
    pub fn suffix(self) -> &'static str {
        match self {
            CubeFace::NegativeX => "negative_x",
            CubeFace::PositiveX => "positive_x",
            CubeFace::NegativeY => "negative_y",
            CubeFace::PositiveY => "positive_y",
            CubeFace::NegativeZ => "negative_z",
            CubeFace::PositiveZ => "positive_z",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The face a direction points at, and the `(u, v)` on that face.
    ///
    /// The face is chosen by the component of largest magnitude.
    pub fn project(d: Vec3) -> (CubeFace, f32, f32) {
        let a = d.abs();
        if a.x >= a.y && a.x >= a.z {
            if d.x >= 0.0 {
                (CubeFace::PositiveX, (1.0 + d.z / d.x) / 2.0, (1.0 + d.y / d.x) / 2.0)
            } else {
                (CubeFace::NegativeX, 1.0 - (1.0 - d.z / d.x) / 2.0, (1.0 - d.y / d.x) / 2.0)
            }
        } else if a.y >= a.z {
            if d.y >= 0.0 {
                (CubeFace::PositiveY, (1.0 + d.x / d.y) / 2.0, 1.0 - (1.0 - d.z / d.y) / 2.0)
            } else {
                (CubeFace::NegativeY, (1.0 - d.x / d.y) / 2.0, (1.0 + d.z / d.y) / 2.0)
            }
        } else if d.z >= 0.0 {
            (CubeFace::PositiveZ, 1.0 - (1.0 + d.x / d.z) / 2.0, (1.0 + d.y / d.z) / 2.0)
        } else {
            (CubeFace::NegativeZ, (1.0 - d.x / d.z) / 2.0, (1.0 - d.y / d.z) / 2.0)
        }
    }
}

/// Six textures surrounding the scene, looked up by direction.
#[derive(Clone, Debug)]
pub struct CubeMap {
    faces: [Arc<Texture>; 6],
}

impl CubeMap {
    /// Faces in [`CubeFace::ALL`] order.
    pub fn new(faces: [Arc<Texture>; 6]) -> Self {
        Self { faces }
    }

    /// Load `{prefix}_{face}.png` for each of the six faces.
    pub fn load(prefix: &str) -> TextureResult<Self> {
        let mut faces = Vec::with_capacity(6);
        for face in CubeFace::ALL {
            let path = format!("{}_{}.png", prefix, face.suffix());
            faces.push(Arc::new(Texture::load(&path)?));
        }
        log::info!("Loaded cube map '{}'", prefix);

        let faces: [Arc<Texture>; 6] = faces
            .try_into()
            .map_err(|_| TextureError::Empty(prefix.to_string()))?;
        Ok(Self { faces })
    }

    pub fn face(&self, face: CubeFace) -> &Texture {
        &self.faces[face.index()]
    }
}

impl EnvironmentMap for CubeMap {
    fn sample(&self, direction: Vec3) -> Colour {
        if direction == Vec3::ZERO {
            return Colour::ZERO;
        }
        let (face, u, v) = CubeFace::project(direction);
        self.face(face).texel(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: black, white / white, black
        Texture::new(
            2,
            2,
            vec![Vec3::ZERO, Vec3::ONE, Vec3::ONE, Vec3::ZERO],
            "checker",
        )
        .unwrap()
    }

    #[test]
    fn test_solid_colour_texture() {
        let tex = Texture::solid_colour(Vec3::new(1.0, 0.5, 0.0));
        let sample = tex.texel(0.3, 0.9);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_texel_corners_and_blend() {
        let tex = checker();
        assert_eq!(tex.texel(0.0, 0.0), Vec3::ZERO);

        // Halfway between texel 0 and texel 1 on the first row.
        let mid = tex.texel(0.25, 0.0);
        assert!((mid - Vec3::splat(0.5)).length() < 1e-5);

        // u = 1.0 stays on the last column instead of wrapping to the first.
        let edge = tex.texel(1.0, 0.0);
        assert!((edge - Vec3::ONE).length() < 1e-3);
    }

    #[test]
    fn test_texel_wraps() {
        let tex = checker();
        let a = tex.texel(0.1, 0.2);
        let b = tex.texel(2.1, -0.8);
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn test_texture_rejects_size_mismatch() {
        assert!(Texture::new(2, 2, vec![Vec3::ZERO], "short").is_err());
        assert!(Texture::new(0, 0, vec![], "none").is_err());
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_cube_face_selection() {
        assert_eq!(CubeFace::project(Vec3::X).0, CubeFace::PositiveX);
        assert_eq!(CubeFace::project(-Vec3::X).0, CubeFace::NegativeX);
        assert_eq!(CubeFace::project(Vec3::new(0.1, 0.9, -0.2)).0, CubeFace::PositiveY);
        assert_eq!(CubeFace::project(Vec3::new(0.1, -0.9, -0.2)).0, CubeFace::NegativeY);
        assert_eq!(CubeFace::project(Vec3::new(0.3, 0.2, 1.0)).0, CubeFace::PositiveZ);
        assert_eq!(CubeFace::project(Vec3::new(0.3, 0.2, -1.0)).0, CubeFace::NegativeZ);

        // Straight at a face lands in its centre.
        let (_, u, v) = CubeFace::project(Vec3::new(0.0, 0.0, -2.0));
        assert!((u - 0.5).abs() < 1e-6 && (v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cube_map_samples_face_colours() {
        let colours = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let faces = colours.map(|c| Arc::new(Texture::solid_colour(c)));
        let map = CubeMap::new(faces);

        for (face, colour) in CubeFace::ALL.iter().zip(colours) {
            let dir = match face {
                CubeFace::NegativeX => -Vec3::X,
                CubeFace::PositiveX => Vec3::X,
                CubeFace::NegativeY => -Vec3::Y,
                CubeFace::PositiveY => Vec3::Y,
                CubeFace::NegativeZ => -Vec3::Z,
                CubeFace::PositiveZ => Vec3::Z,
            };
            assert_eq!(map.sample(dir), colour);
        }
    }

    #[test]
    fn test_cube_map_missing_files() {
        assert!(CubeMap::load("/no/such/prefix").is_err());
    }
}
