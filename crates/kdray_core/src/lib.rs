//! kdray core - scene data model for the kdray ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: analytic `Shape`s and triangle `Mesh`es with their kd-tree
//! - **Scene types**: `Surface`, `Scene`, `Material`, `Light`
//! - **Lookups**: image `Texture`s, `CubeMap`s and other environment maps
//! - **Import**: Wavefront OBJ meshes via `load_obj`
//!
//! Nothing here traces rays; that is `kdray_renderer`'s job.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kdray_core::{load_obj, Colour, Material, Scene, Shape, Surface, Transform};
//!
//! let mesh = load_obj("bunny.obj")?;
//! let mut scene = Scene::new(Colour::ZERO);
//! scene.add_surface(Surface::from_transform(
//!     Arc::new(Shape::Mesh(mesh)),
//!     Arc::new(Material::default()),
//!     &Transform::default(),
//! ));
//! ```

pub mod environment;
pub mod kdtree;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod shape;
pub mod texture;

// Re-export commonly used types
pub use environment::{EnvironmentMap, SkyGradient, UniformEnvironment};
pub use kdtree::{KdNode, KD_LEAF_TRIANGLES, KD_MAX_DEPTH};
pub use light::{Light, LightSample};
pub use material::{Colour, Material, ShadingModel};
pub use mesh::{load_obj, Mesh, MeshError, MeshResult, Triangle};
pub use scene::{Scene, Surface, Transform};
pub use shape::{Cone, Cylinder, Disk, Plane, Shape, Sphere, Torus};
pub use texture::{CubeFace, CubeMap, Texture, TextureError, TextureResult};
