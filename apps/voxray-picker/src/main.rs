//! Voxray Ray Picking Demo
//!
//! Builds a sample octree world, orbits a camera around it and logs which cube
//! each camera ray picks. Halfway through, the world is reloaded to show that
//! pickers holding the old generation stop resolving it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxray-picker -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--depth <N>`: Octree depth of the sample world (default: 4)
//! - `--rays <N>`: Number of camera positions around the orbit (default: 8)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod world;

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;
#[cfg(feature = "profiling-tracy")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxray_collision::{box_entry_distance, CollisionConfig, CollisionData, OctreeCollision};
use voxray_core::{Aabb, Ray};
use voxray_world::SharedOctree;

/// Distance of the orbiting camera from the world center.
const ORBIT_RADIUS: f32 = 80.0;
/// Camera height above the world center.
const ORBIT_HEIGHT: f32 = 12.0;

/// Picker options (from CLI or defaults).
#[derive(Debug, Clone)]
struct PickerParams {
    depth: u32,
    rays: u32,
}

impl Default for PickerParams {
    fn default() -> Self {
        Self { depth: 4, rays: 8 }
    }
}

impl PickerParams {
    /// Parse picker parameters from command line arguments.
    fn from_args() -> Self {
        let mut params = Self::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--depth" => {
                    if let Some(v) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        params.depth = v;
                        i += 1;
                    }
                }
                "--rays" => {
                    if let Some(v) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        params.rays = v;
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        params
    }
}

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    init_tracing();

    let params = PickerParams::from_args();
    let config = CollisionConfig::default();
    anyhow::ensure!(
        params.depth <= config.max_depth,
        "depth {} exceeds the collision limit of {}",
        params.depth,
        config.max_depth
    );

    let shared = SharedOctree::new(world::build(params.depth)?);
    let mut picker = picker_for(&shared, config);

    for step in 0..params.rays {
        if step == params.rays / 2 {
            shared.replace(world::build(params.depth.saturating_sub(1))?);
            info!("World reloaded");
            if picker.check_for_collision(camera_position(step, params.rays), Vec3::NEG_X).is_none() {
                info!("Old picker no longer resolves the world");
            }
            picker = picker_for(&shared, config);
        }

        let position = camera_position(step, params.rays);
        // Aim slightly below the center so rays cross the lower octants.
        let direction = Vec3::new(0.0, -ORBIT_HEIGHT * 0.5, 0.0) - position;

        let touched = picker.check_for_collisions(position, direction).len();
        match picker.check_for_collision(position, direction) {
            Some(hit) => info!(
                step,
                center = %hit.center(),
                size = hit.size(),
                entry = ?entry_point(&hit, Ray::new(position, direction)),
                touched,
                "Picked cube"
            ),
            None => info!(step, "Nothing picked"),
        }
    }

    Ok(())
}

fn picker_for(shared: &SharedOctree, config: CollisionConfig) -> OctreeCollision {
    OctreeCollision::new(&shared.snapshot()).with_config(config)
}

/// Point where the ray first enters the picked cube, or the origin when it
/// starts inside.
fn entry_point(hit: &CollisionData, ray: Ray) -> Option<Vec3> {
    let bounds = Aabb::from_center_size(hit.center(), hit.size()).bounds();
    let (t_min, _) = box_entry_distance(bounds, ray.origin, ray.direction)?;
    Some(ray.at(t_min.max(0.0)))
}

fn camera_position(step: u32, steps: u32) -> Vec3 {
    let angle = TAU * step as f32 / steps.max(1) as f32;
    Vec3::new(
        ORBIT_RADIUS * angle.cos(),
        ORBIT_HEIGHT,
        ORBIT_RADIUS * angle.sin(),
    )
}

fn init_tracing() {
    #[cfg(feature = "profiling-tracy")]
    {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,voxray_collision=trace,voxray_world=trace,voxray_picker=trace")
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_tracy::TracyLayer::default())
            .init();
    }
    #[cfg(not(feature = "profiling-tracy"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }
}

fn print_help() {
    eprintln!(
        "Voxray Ray Picking Demo

USAGE:
    cargo run -p voxray-picker -- [OPTIONS]

OPTIONS:
    --depth <N>     Octree depth of the sample world (default: 4)
    --rays <N>      Camera positions around the orbit (default: 8)
    -h, --help      Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG        Set log level (e.g., info, debug, trace)"
    );
}
