//! kdray renderer - recursive CPU ray tracing.
//!
//! Traces rays through a [`kdray_core::Scene`]: exact intersection with the
//! analytic shapes, kd-tree accelerated triangle meshes, shadow rays toward
//! every light, and mirror or glossy reflection up to a fixed depth.
//!
//! Rendering is single-threaded and deterministic for a given random
//! number generator state.

mod bucket;
mod camera;
mod candidates;
mod cone;
mod cylinder;
mod error;
mod hittable;
mod kdtree;
mod material;
mod planar;
mod renderer;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use candidates::Candidates;
pub use error::{TraceError, TraceResult};
pub use hittable::{intersect_shape, Hit, Hittable};
pub use kdtree::{intersect_mesh, MeshHit};
pub use material::{evaluate, glossy_direction, reflect};
pub use renderer::{
    colour_to_rgba, linear_to_gamma, ray_colour, render, render_pixel, ImageBuffer, RenderConfig,
    REFLECT_EPSILON, SHADOW_EPSILON,
};
pub use triangle::TriangleHit;
