//! Shared engine state handed to task results on the main thread.

use std::collections::HashSet;

use log::debug;

use super::rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask;
use super::task_management::task::Task;
use super::voxels::chunk::ChunkIndex;
use super::voxels::generation::WorldGenerator;
use super::voxels::tasks::chunk_generation_task::ChunkGenerationTask;
use super::voxels::world::World;
use crate::core::MtResource;

/// The world, the generator, and bookkeeping of work already queued for them.
pub struct EngineContext {
    /// The chunk index.
    pub world: MtResource<World>,
    /// Terrain generator shared with generation tasks.
    pub generator: MtResource<WorldGenerator>,
    /// Chunks with a generation task queued or in flight.
    pub pending_generation: HashSet<ChunkIndex>,
    /// Chunks with a mesh task queued or in flight.
    pub pending_meshes: HashSet<ChunkIndex>,
}

impl EngineContext {
    /// Creates a context with no pending work.
    pub fn new(world: MtResource<World>, generator: MtResource<WorldGenerator>) -> Self {
        EngineContext {
            world,
            generator,
            pending_generation: HashSet::new(),
            pending_meshes: HashSet::new(),
        }
    }

    /// A generation task for `index`, unless the chunk exists or is already pending.
    pub fn generation_task(&mut self, index: ChunkIndex) -> Option<Box<dyn Task>> {
        if self.world.get().contains_chunk(index) || !self.pending_generation.insert(index) {
            return None;
        }
        debug!("Queueing generation of chunk ({}, {})", index.i, index.j);
        Some(Box::new(ChunkGenerationTask::new(
            self.generator.clone(),
            index,
        )))
    }

    /// A mesh task for `index`, unless one is already pending or the chunk is missing.
    pub fn mesh_task(&mut self, index: ChunkIndex) -> Option<Box<dyn Task>> {
        if self.pending_meshes.contains(&index) {
            return None;
        }
        let chunk = self.world.get().chunk(index)?;
        self.pending_meshes.insert(index);
        Some(Box::new(ChunkMeshGenerationTask::new(
            self.world.clone(),
            chunk,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::Chunk;

    fn context() -> EngineContext {
        EngineContext::new(
            MtResource::new(World::new()),
            MtResource::new(WorldGenerator::new(1)),
        )
    }

    #[test]
    fn generation_is_queued_once_per_chunk() {
        let mut context = context();
        let index = ChunkIndex::new(0, 0);
        assert!(context.generation_task(index).is_some());
        assert!(context.generation_task(index).is_none());

        let registered = ChunkIndex::new(1, 0);
        context
            .world
            .get_mut()
            .add_chunk(Chunk::new(registered))
            .unwrap();
        assert!(context.generation_task(registered).is_none());
    }

    #[test]
    fn mesh_tasks_need_a_registered_chunk() {
        let mut context = context();
        let index = ChunkIndex::new(0, 0);
        assert!(context.mesh_task(index).is_none());
        assert!(context.pending_meshes.is_empty());

        context.world.get_mut().add_chunk(Chunk::new(index)).unwrap();
        assert!(context.mesh_task(index).is_some());
        assert!(context.mesh_task(index).is_none());
        assert!(context.pending_meshes.contains(&index));
    }
}
