//! # Engine State Module
//!
//! The core engine module that owns the world and drives the work around it.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `config` - Startup configuration
//! * `context` - Engine state handed to task results on the main thread
//! * `rendering` - Meshing and the renderer contract
//! * `task_management` - The deferred work queue and its worker threads
//! * `voxels` - Voxel data, chunks, the world index and terrain generation
//!
//! ## Frame Loop
//!
//! The host calls, once per frame:
//!
//! 1. `update_player_position` with the camera position, which queues generation of
//!    missing chunks in view
//! 2. `tick`, which applies finished work, re-queues stale meshes and dispatches a
//!    bounded number of new tasks
//! 3. `render` with its own [`MeshRenderer`]
//!
//! Block breaking (`break_targeted_block`) is synchronous: the owning chunk's mesh is
//! rebuilt and committed before the call returns.

use cgmath::{Point3, Vector3};
use log::{debug, info};
use web_time::Instant;

use crate::core::MtResource;

pub mod config;
pub mod context;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

use config::EngineConfig;
use context::EngineContext;
use error::{EngineError, EngineResult};
use rendering::{render_world, MeshRenderer, RenderStats};
use task_management::TaskManager;
use voxels::chunk::{BlockBreak, ChunkIndex, CHUNK_HEIGHT, CHUNK_WIDTH};
use voxels::coordinates::{grid_to_world, world_to_chunk_index};
use voxels::generation::WorldGenerator;
use voxels::world::World;

/// What one [`EngineState::tick`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    /// Task results applied on the main thread.
    pub results_applied: usize,
    /// Mesh builds queued for chunks found dirty.
    pub meshes_requeued: usize,
    /// Tasks handed to workers or run inline.
    pub dispatched: usize,
    /// Tasks still waiting after the tick.
    pub queued: usize,
}

/// The main state container for the voxel engine.
///
/// Owns the world (through the shared [`EngineContext`]), the task manager and the
/// player's last known position.
pub struct EngineState {
    config: EngineConfig,
    task_manager: TaskManager,
    context: EngineContext,
    player_position: Point3<f32>,
    player_chunk: ChunkIndex,
}

impl EngineState {
    /// Builds the initial `(2r + 1)²` chunks around the origin, meshes and commits
    /// them, and starts the worker pool.
    ///
    /// The initial world is built synchronously so the first frame has something to
    /// draw. Everything after that streams in through the task queue.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        let start = Instant::now();
        let generator = WorldGenerator::new(config.seed);
        let mut world = World::new();
        let radius = config.initial_radius;
        for i in -radius..=radius {
            for j in -radius..=radius {
                world.add_chunk(generator.generate_chunk(ChunkIndex::new(i, j)))?;
            }
        }

        for index in world.chunk_indices() {
            let Some(chunk) = world.chunk(index) else {
                continue;
            };
            {
                let neighborhood = world.neighborhood(index);
                chunk.get().build_mesh(&neighborhood);
            }
            chunk.get_mut().commit_mesh();
        }

        let (opaque, translucent) = world.total_face_counts();
        info!(
            "Initial world of {} chunk(s) built in {:?} ({} opaque, {} translucent faces)",
            world.len(),
            start.elapsed(),
            opaque,
            translucent
        );

        let task_manager =
            TaskManager::new(config.worker_threads).map_err(EngineError::WorkerSpawn)?;
        let context = EngineContext::new(MtResource::new(world), MtResource::new(generator));

        let mut state = EngineState {
            config,
            task_manager,
            context,
            player_position: Point3::new(0.0, 0.0, 0.0),
            player_chunk: ChunkIndex::new(0, 0),
        };
        state.player_position = state.spawn_position();
        Ok(state)
    }

    /// A point two blocks above the terrain at the world origin.
    pub fn spawn_position(&self) -> Point3<f32> {
        let top = Point3::new(0.0, grid_to_world(CHUNK_HEIGHT - 1), 0.0);
        let floor = self.context.world.get().depth_at(top);
        Point3::new(0.0, floor + grid_to_world(2), 0.0)
    }

    /// Records the player's position and queues generation of every missing chunk
    /// within `view_distance` of the player's chunk, nearest first.
    ///
    /// # Returns
    /// The number of generation tasks queued.
    pub fn update_player_position(&mut self, position: Point3<f32>) -> usize {
        self.player_position = position;
        let center = world_to_chunk_index(position);
        if center != self.player_chunk {
            debug!(
                "Player moved into chunk ({}, {})",
                center.i, center.j
            );
            self.player_chunk = center;
        }

        let view = self.config.view_distance;
        let mut wanted: Vec<ChunkIndex> = (-view..=view)
            .flat_map(|di| (-view..=view).map(move |dj| center.offset(di, dj)))
            .collect();
        wanted.sort_by_key(|index| (index.chebyshev_distance(center), *index));

        let tasks: Vec<_> = wanted
            .into_iter()
            .filter_map(|index| self.context.generation_task(index))
            .collect();
        let queued = tasks.len();
        self.task_manager.publish_tasks(tasks);
        queued
    }

    /// Runs one frame's worth of deferred work.
    ///
    /// Applies finished results, queues mesh builds for dirty chunks that have none
    /// pending, then dispatches at most `tasks_per_tick` tasks.
    pub fn tick(&mut self) -> TickStats {
        let results_applied = self.task_manager.process_completed_tasks(&mut self.context);
        let meshes_requeued = self.queue_dirty_meshes();
        let dispatched = self.task_manager.run_up_to(self.config.tasks_per_tick);

        TickStats {
            results_applied,
            meshes_requeued,
            dispatched,
            queued: self.task_manager.queued(),
        }
    }

    fn queue_dirty_meshes(&mut self) -> usize {
        let dirty = self.context.world.get().dirty_chunks();
        let tasks: Vec<_> = dirty
            .into_iter()
            .filter_map(|index| self.context.mesh_task(index))
            .collect();
        let queued = tasks.len();
        self.task_manager.publish_tasks(tasks);
        queued
    }

    /// Ticks until no task is queued or running and no chunk is dirty.
    ///
    /// Blocks on worker results instead of spinning when only in-flight work remains.
    ///
    /// # Returns
    /// The number of ticks taken.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        loop {
            self.tick();
            ticks += 1;
            if self.is_idle() {
                return ticks;
            }
            if self.task_manager.queued() == 0 {
                self.task_manager.wait_for_completed(&mut self.context);
            }
        }
    }

    /// Whether all streaming and remeshing work has settled.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle() && self.context.world.get().dirty_chunks().is_empty()
    }

    /// Breaks the first voxel hit by a ray from `origin` along `direction`.
    ///
    /// Mine-through voxels are passed over. Unbreakable voxels stop the ray and
    /// nothing is broken.
    pub fn break_targeted_block(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        reach: f32,
    ) -> Option<BlockBreak> {
        let world = self.context.world.get();
        let target = world.first_targeted_voxel(origin, direction, reach)?;
        if !target.voxel_type.is_breakable() {
            debug!(
                "Target {:?} at ({}, {}, {}) is unbreakable",
                target.voxel_type, target.grid.x, target.grid.y, target.grid.z
            );
            return None;
        }
        world.remove_block_at_grid(target.grid)
    }

    /// Draws every built chunk within the view distance of the player.
    pub fn render(&self, renderer: &mut dyn MeshRenderer) -> RenderStats {
        // Reaches the far corner of the outermost chunk in view.
        let reach = (self.config.view_distance as f32 + 1.5)
            * grid_to_world(CHUNK_WIDTH)
            * std::f32::consts::SQRT_2;
        render_world(
            &self.context.world.get(),
            self.player_position,
            reach,
            renderer,
        )
    }

    pub fn world(&self) -> &MtResource<World> {
        &self.context.world
    }

    pub fn generator(&self) -> &MtResource<WorldGenerator> {
        &self.context.generator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn player_position(&self) -> Point3<f32> {
        self.player_position
    }

    /// Tasks waiting to be dispatched.
    pub fn queued_tasks(&self) -> usize {
        self.task_manager.queued()
    }

    /// Tasks dispatched whose results are not applied yet.
    pub fn tasks_in_flight(&self) -> usize {
        self.task_manager.in_flight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

    fn config(worker_threads: usize) -> EngineConfig {
        EngineConfig {
            seed: 99,
            initial_radius: 0,
            view_distance: 1,
            tasks_per_tick: 2,
            worker_threads,
            log_filter: None,
        }
    }

    #[test]
    fn initial_world_is_built_synchronously() {
        let state = EngineState::new(config(0)).unwrap();
        let world = state.world().get();
        assert_eq!(world.len(), 1);
        let chunk = world.chunk(ChunkIndex::new(0, 0)).unwrap();
        assert!(chunk.get().is_built());
        assert!(!chunk.get().is_dirty());
        assert!(state.is_idle());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut bad = config(0);
        bad.tasks_per_tick = 0;
        assert!(matches!(
            EngineState::new(bad),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn ticks_dispatch_at_most_tasks_per_tick() {
        let mut state = EngineState::new(config(0)).unwrap();
        assert_eq!(state.update_player_position(state.spawn_position()), 8);
        assert_eq!(state.update_player_position(state.spawn_position()), 0);

        let stats = state.tick();
        assert_eq!(stats.dispatched, 2);
        assert_eq!(stats.queued, 6);
        assert_eq!(state.world().get().len(), 1);
    }

    #[test]
    fn streaming_settles_with_workers() {
        let mut state = EngineState::new(config(2)).unwrap();
        state.update_player_position(state.spawn_position());
        state.run_until_idle();

        let world = state.world().get();
        assert_eq!(world.len(), 9);
        for index in world.chunk_indices() {
            let chunk = world.chunk(index).unwrap();
            let chunk = chunk.get();
            assert!(chunk.is_generated() && chunk.is_built() && !chunk.is_dirty());
        }
    }

    #[test]
    fn spawn_is_above_the_terrain() {
        let state = EngineState::new(config(0)).unwrap();
        let spawn = state.spawn_position();
        let world = state.world().get();
        assert!(world.solid_voxel_at(spawn).is_none());
        assert!(spawn.y > 0.0);
    }

    #[test]
    fn breaking_straight_down_removes_the_surface() {
        let mut state = EngineState::new(config(0)).unwrap();
        let spawn = state.spawn_position();
        let broken = state
            .break_targeted_block(spawn, Vector3::new(0.0, -1.0, 0.0), 8.0)
            .unwrap();

        // Chunk-local, which equals grid coordinates in chunk (0, 0).
        let (cell, voxel_type) = broken.removed[0];
        assert_ne!(voxel_type, VoxelType::BEDROCK);
        assert!(state.world().get().voxel_at_grid(cell).is_none());
        assert!(state.is_idle());
    }
}
