//! Surface materials.
//!
//! A material describes how a surface responds to direct light (its
//! shading model) and how much of the scene it mirrors (its reflectivity
//! and glossiness). Evaluation lives in the renderer; these are plain data.

use kdray_math::Vec3;

/// Linear RGB colour.
pub type Colour = Vec3;

/// How a material responds to a single light sample.
#[derive(Clone, Debug, PartialEq)]
pub enum ShadingModel {
    /// Lambertian term only.
    Diffuse,

    /// Lambertian term plus a Blinn half-vector highlight.
    Phong,

    /// Weighted sum of other materials' direct-light responses.
    Combined(Vec<(f32, Material)>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (used in log output)
    pub name: String,

    pub diffuse_colour: Colour,

    /// Highlight colour, also the tint applied to reflections
    pub specular_colour: Colour,

    /// Highlight exponent
    pub shininess: f32,

    /// Fraction of the reflected ray's colour that is added (0 = none)
    pub reflectivity: f32,

    /// Spread of glossy reflections (0 = perfect mirror)
    pub glossiness: f32,

    pub model: ShadingModel,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_colour: Colour::splat(0.5), // Grey default
            specular_colour: Colour::ONE,
            shininess: 32.0,
            reflectivity: 0.0,
            glossiness: 0.0,
            model: ShadingModel::Diffuse,
        }
    }
}

impl Material {
    /// A plain diffuse material.
    pub fn diffuse(name: impl Into<String>, diffuse_colour: Colour) -> Self {
        Self {
            name: name.into(),
            diffuse_colour,
            ..Default::default()
        }
    }

    /// A diffuse material with a highlight.
    pub fn phong(name: impl Into<String>, diffuse_colour: Colour, specular_colour: Colour, shininess: f32) -> Self {
        Self {
            name: name.into(),
            diffuse_colour,
            specular_colour,
            shininess,
            model: ShadingModel::Phong,
            ..Default::default()
        }
    }

    /// Blend of sub-materials. Reflectivity is set on the result, not taken
    /// from the parts.
    pub fn combined(name: impl Into<String>, parts: Vec<(f32, Material)>) -> Self {
        Self {
            name: name.into(),
            model: ShadingModel::Combined(parts),
            ..Default::default()
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_glossiness(mut self, glossiness: f32) -> Self {
        self.glossiness = glossiness;
        self
    }

    /// True when hits spawn a reflection ray.
    pub fn is_reflective(&self) -> bool {
        self.reflectivity > 0.0 && self.specular_colour != Colour::ZERO
    }

    pub fn is_glossy(&self) -> bool {
        self.glossiness > 0.0
    }
}
