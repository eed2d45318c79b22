//! # Chunk Generation Task
//!
//! Fills a new chunk with terrain off the main thread. The chunk is registered with
//! the world only when the result is applied, so workers never write to the world.

use log::{debug, warn};

use crate::{
    core::MtResource,
    engine_state::{
        context::EngineContext,
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkIndex},
            generation::WorldGenerator,
        },
    },
};

/// A task that generates the terrain of one chunk.
pub struct ChunkGenerationTask {
    /// Shared generator. Generation only needs a read guard.
    generator: MtResource<WorldGenerator>,
    /// The chunk to generate
    index: ChunkIndex,
}

impl ChunkGenerationTask {
    pub fn new(generator: MtResource<WorldGenerator>, index: ChunkIndex) -> Self {
        ChunkGenerationTask { generator, index }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult> {
        let chunk = self.generator.get().generate_chunk(self.index);
        Box::new(ChunkGenerationTaskResult { chunk })
    }
}

/// A freshly generated chunk waiting to be registered.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Registers the chunk, dirties its generated neighbours and queues mesh builds
    /// for all of them.
    fn handle_result(self: Box<Self>, context: &mut EngineContext) -> Vec<Box<dyn Task>> {
        let index = self.chunk.index();
        context.pending_generation.remove(&index);

        if let Err(err) = context.world.get_mut().add_chunk(self.chunk) {
            warn!("Dropping generated chunk: {}", err);
            return Vec::new();
        }

        let neighbors = context.world.get().mark_neighbors_dirty(index);
        debug!(
            "Registered chunk ({}, {}), {} neighbour(s) need remeshing",
            index.i,
            index.j,
            neighbors.len()
        );

        std::iter::once(index)
            .chain(neighbors)
            .filter_map(|chunk| context.mesh_task(chunk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::world::World;

    fn context() -> EngineContext {
        EngineContext::new(
            MtResource::new(World::new()),
            MtResource::new(WorldGenerator::new(11)),
        )
    }

    #[test]
    fn result_registers_chunk_and_requests_its_mesh() {
        let mut context = context();
        let index = ChunkIndex::new(0, 0);
        let task = context.generation_task(index).unwrap();

        let follow_ups = task.process().handle_result(&mut context);

        assert!(context.world.get().contains_chunk(index));
        assert!(context.pending_generation.is_empty());
        assert_eq!(follow_ups.len(), 1);
        assert!(context.pending_meshes.contains(&index));
    }

    #[test]
    fn generated_neighbours_are_dirtied_and_remeshed() {
        let mut context = context();
        let first = ChunkIndex::new(0, 0);
        let second = ChunkIndex::new(1, 0);

        let task = context.generation_task(first).unwrap();
        for mesh in task.process().handle_result(&mut context) {
            mesh.process().handle_result(&mut context);
        }
        assert!(!context.world.get().chunk(first).unwrap().get().is_dirty());

        let task = context.generation_task(second).unwrap();
        let follow_ups = task.process().handle_result(&mut context);

        assert_eq!(follow_ups.len(), 2);
        assert!(context.world.get().chunk(first).unwrap().get().is_dirty());
        assert!(context.pending_meshes.contains(&first));
        assert!(context.pending_meshes.contains(&second));
    }

    #[test]
    fn duplicate_results_are_dropped() {
        let mut context = context();
        let index = ChunkIndex::new(2, -1);
        let generator = context.generator.clone();

        ChunkGenerationTask::new(generator.clone(), index)
            .process()
            .handle_result(&mut context);
        let follow_ups = ChunkGenerationTask::new(generator, index)
            .process()
            .handle_result(&mut context);

        assert!(follow_ups.is_empty());
        assert_eq!(context.world.get().len(), 1);
    }
}
