//! kdray - render a scene to a PNG from the command line.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use kdray_core::{load_obj, CubeMap, EnvironmentMap, SkyGradient};
use kdray_math::Vec3;
use kdray_renderer::{render, Camera, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod demo;

#[derive(Parser)]
#[command(name = "kdray")]
#[command(about = "Offline ray tracer with kd-tree accelerated meshes", long_about = None)]
struct Cli {
    /// JSON render settings; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wavefront OBJ mesh to add to the demo scene
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Cube map prefix: loads PREFIX_positive_x.png, PREFIX_negative_x.png, ...
    #[arg(short, long)]
    environment: Option<String>,

    /// Image width, overriding the config file
    #[arg(long)]
    width: Option<u32>,

    /// Image height, overriding the config file
    #[arg(long)]
    height: Option<u32>,

    /// Seed for area-light, glossy and anti-aliasing jitter
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Where to write the PNG
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RenderConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    Ok(config.sanitized())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::info!("Render settings: {config:?}");

    let mesh = match &cli.mesh {
        Some(path) => Some(load_obj(path).with_context(|| format!("loading mesh {}", path.display()))?),
        None => None,
    };

    let environment: Arc<dyn EnvironmentMap> = match &cli.environment {
        Some(prefix) => {
            Arc::new(CubeMap::load(prefix).with_context(|| format!("loading cube map {prefix}"))?)
        }
        None => Arc::new(SkyGradient::default()),
    };

    let scene = demo::build(mesh).with_environment(environment);
    log::info!(
        "Scene ready: {} surfaces, {} triangles, {} lights",
        scene.surface_count(),
        scene.total_triangle_count(),
        scene.lights.len()
    );

    let camera = Camera::new(
        Vec3::new(0.0, 1.0, 7.0),
        Vec3::new(0.0, -0.15, -1.0),
        Vec3::Y,
        45.0,
        config.width,
        config.height,
    );

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let image = render(&scene, &camera, &config, &mut rng).context("rendering scene")?;
    log::info!("Finished in {:.2?}", start.elapsed());

    let png = RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("image buffer does not match its dimensions")?;
    png.save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!("Wrote {}", cli.output.display());

    Ok(())
}
