//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are traced one after the
//! other, starting from the centre of the frame.

use kdray_core::{Colour, Scene};
use rand::RngCore;

use crate::camera::Camera;
use crate::error::TraceResult;
use crate::renderer::{render_pixel, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets near the middle of the frame come first, so a partial render
/// already shows the part of the image that usually matters most.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let cx = b.x as f32 + b.width as f32 / 2.0;
        let cy = b.y as f32 + b.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    // Stable sort keeps row-major order between equidistant buckets.
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colours in row-major order
    pub pixels: Vec<Colour>,
}

/// Render a single bucket, every pixel complete before the next.
pub fn render_bucket(
    bucket: &Bucket,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> TraceResult<BucketResult> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let colour = render_pixel(scene, camera, bucket.x + local_x, bucket.y + local_y, config, rng)?;
            pixels.push(colour);
        }
    }

    Ok(BucketResult {
        bucket: *bucket,
        pixels,
    })
}
