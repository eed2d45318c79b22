#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World Engine
//!
//! A headless voxel world core: seeded procedural terrain, chunked voxel storage,
//! face-culled meshing and block breaking, driven through a deferred work queue.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership primitives used across threads
//! * `engine_state` - The world, its generation and meshing, and the task system
//!
//! ## Architecture
//!
//! The engine owns voxel data and geometry but no graphics context. A host supplies
//! the player position each frame, calls `EngineState::tick`, and draws the committed
//! meshes through its own `MeshRenderer`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use voxel_world_engine::engine_state::{config::EngineConfig, EngineState};
//!
//! let mut engine = EngineState::new(EngineConfig::default()).unwrap();
//! engine.update_player_position(engine.spawn_position());
//! engine.run_until_idle();
//! ```

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

pub mod core;
pub mod engine_state;

use engine_state::config::EngineConfig;
use engine_state::error::EngineResult;
use engine_state::rendering::vertex::{as_bytes, Vertex};
use engine_state::rendering::MeshRenderer;
use engine_state::voxels::chunk::CHUNK_WIDTH;
use engine_state::voxels::coordinates::grid_to_world;
use engine_state::EngineState;

/// Reach of the smoke driver's block breaking, in world units.
const BREAK_REACH: f32 = 8.0;

/// Counts what would have been uploaded to the GPU.
#[derive(Default)]
struct HeadlessRenderer {
    buffers: usize,
    faces: usize,
    bytes: usize,
}

impl MeshRenderer for HeadlessRenderer {
    fn render_vertex_buffer(&mut self, _origin: Point3<f32>, vertices: &[Vertex], face_count: usize) {
        self.buffers += 1;
        self.faces += face_count;
        self.bytes += as_bytes(vertices).len();
    }
}

fn init_logger(config_filter: Option<&str>) {
    let mut log_builder = env_logger::Builder::new();
    log_builder.target(env_logger::Target::Stdout);
    match (std::env::var("RUST_LOG").is_ok(), config_filter) {
        (false, Some(filter)) => {
            log_builder.parse_filters(filter);
        }
        _ => {
            log_builder.parse_env("RUST_LOG");
        }
    }
    // A second initialisation (tests, embedding hosts) keeps the first logger.
    let _ = log_builder.try_init();
}

/// Headless smoke run.
///
/// Loads the config named by the first command-line argument (defaults otherwise),
/// builds the initial world, walks the player east far enough to stream in new
/// chunks, breaks the block under the spawn point and logs what the renderer would
/// draw.
pub fn run() -> EngineResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    };
    init_logger(
        config
            .as_ref()
            .ok()
            .and_then(|config| config.log_filter.as_deref()),
    );
    let config = config?;
    info!("Logger initialized");
    info!("Starting with {:?}", config);

    let start = Instant::now();
    let mut engine = EngineState::new(config)?;

    let spawn = engine.spawn_position();
    let step = grid_to_world(CHUNK_WIDTH) / 2.0;
    let steps = (engine.config().view_distance + 2) * 2;
    for n in 0..=steps {
        let position = Point3::new(spawn.x + step * n as f32, spawn.y, spawn.z);
        let queued = engine.update_player_position(position);
        let stats = engine.tick();
        info!(
            "Step {}: queued {} chunk(s), applied {}, dispatched {}, {} waiting",
            n, queued, stats.results_applied, stats.dispatched, stats.queued
        );
    }
    let ticks = engine.run_until_idle();
    info!("Streaming settled after {} more tick(s)", ticks);

    match engine.break_targeted_block(spawn, Vector3::new(0.0, -1.0, 0.0), BREAK_REACH) {
        Some(broken) => info!("Broke {:?}", broken.removed),
        None => info!("Nothing breakable below spawn"),
    }
    engine.run_until_idle();

    let mut renderer = HeadlessRenderer::default();
    let render_stats = engine.render(&mut renderer);
    let world = engine.world().get();
    let (opaque, translucent) = world.total_face_counts();
    info!(
        "{} chunk(s) in world, {} drawn: {} opaque and {} translucent faces in view, {} buffers, {} faces, {} bytes",
        world.len(),
        render_stats.chunks_drawn,
        render_stats.opaque_faces,
        render_stats.translucent_faces,
        renderer.buffers,
        renderer.faces,
        renderer.bytes
    );
    info!(
        "World holds {} opaque and {} translucent faces; finished in {:?}",
        opaque,
        translucent,
        start.elapsed()
    );
    Ok(())
}
