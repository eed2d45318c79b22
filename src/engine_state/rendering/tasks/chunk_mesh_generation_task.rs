//! Task for building a chunk's mesh in a background thread.
//!
//! The worker only takes read guards. The world is read just long enough to clone
//! the neighbour handles, so the main thread can keep registering chunks while the
//! build runs against the chunk and its neighbours. The built mesh is parked in the
//! chunk's staging slot and swapped in on the main thread when the result is applied.

use log::trace;

use crate::{
    core::MtResource,
    engine_state::{
        context::EngineContext,
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{neighborhood::ChunkNeighborhood, Chunk, ChunkIndex},
            world::World,
        },
    },
};

/// A task that meshes one chunk against its current neighbours.
pub struct ChunkMeshGenerationTask {
    /// Source of the neighbouring chunks
    world: MtResource<World>,
    /// The chunk to mesh
    chunk: MtResource<Chunk>,
    index: ChunkIndex,
}

impl ChunkMeshGenerationTask {
    pub fn new(world: MtResource<World>, chunk: MtResource<Chunk>) -> Self {
        let index = chunk.get().index();
        ChunkMeshGenerationTask {
            world,
            chunk,
            index,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult> {
        let handles = self.world.get().neighbor_handles(self.index);
        let neighborhood = ChunkNeighborhood::from_handles(self.index, &handles);
        let face_count = self.chunk.get().build_mesh(&neighborhood);
        trace!(
            "Staged {} face(s) for chunk ({}, {})",
            face_count,
            self.index.i,
            self.index.j
        );

        Box::new(ChunkMeshGenerationTaskResult {
            chunk: self.chunk.clone(),
            index: self.index,
        })
    }
}

/// A staged mesh waiting to be committed.
pub struct ChunkMeshGenerationTaskResult {
    chunk: MtResource<Chunk>,
    index: ChunkIndex,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Swaps the staged mesh in. A chunk dirtied again during the build stays dirty
    /// and is picked up by the next dirty scan.
    fn handle_result(self: Box<Self>, context: &mut EngineContext) -> Vec<Box<dyn Task>> {
        context.pending_meshes.remove(&self.index);
        self.chunk.get_mut().commit_mesh();
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{generation::WorldGenerator, voxel::voxel_type::VoxelType};

    fn context_with_chunk(index: ChunkIndex) -> EngineContext {
        let context = EngineContext::new(
            MtResource::new(World::new()),
            MtResource::new(WorldGenerator::new(5)),
        );
        let mut chunk = Chunk::new(index);
        chunk.set_voxel(4, 10, 4, Some(VoxelType::STONE));
        chunk.mark_generated();
        chunk.mark_dirty();
        context.world.get_mut().add_chunk(chunk).unwrap();
        context
    }

    #[test]
    fn build_and_commit_cleans_the_chunk() {
        let index = ChunkIndex::new(0, 0);
        let mut context = context_with_chunk(index);
        let task = context.mesh_task(index).unwrap();

        let result = task.process();
        let chunk = context.world.get().chunk(index).unwrap();
        assert!(chunk.get().has_staged_mesh());
        assert_eq!(chunk.get().mesh().face_count(), 0);

        result.handle_result(&mut context);
        assert!(!chunk.get().is_dirty());
        assert!(chunk.get().is_built());
        assert_eq!(chunk.get().mesh().face_count(), 6);
        assert!(context.pending_meshes.is_empty());
    }

    #[test]
    fn edits_during_a_build_keep_the_chunk_dirty() {
        let index = ChunkIndex::new(0, 0);
        let mut context = context_with_chunk(index);
        let task = context.mesh_task(index).unwrap();
        let result = task.process();

        let chunk = context.world.get().chunk(index).unwrap();
        chunk.get_mut().mark_dirty();
        result.handle_result(&mut context);

        assert!(chunk.get().is_dirty());
        assert_eq!(context.world.get().dirty_chunks(), vec![index]);
    }

    #[test]
    fn build_does_not_hold_the_world_lock() {
        let index = ChunkIndex::new(0, 0);
        let mut context = context_with_chunk(index);
        let mut east = Chunk::new(ChunkIndex::new(1, 0));
        east.mark_generated();
        context.world.get_mut().add_chunk(east).unwrap();
        let task = context.mesh_task(index).unwrap();

        // Hold a neighbour read guard the way a build in progress would, then register
        // a chunk from this thread. It would deadlock if the world were still locked.
        let handles = context.world.get().neighbor_handles(index);
        let neighborhood = ChunkNeighborhood::from_handles(index, &handles);
        context
            .world
            .get_mut()
            .add_chunk(Chunk::new(ChunkIndex::new(0, 1)))
            .unwrap();
        assert_eq!(neighborhood.len(), 1);
        drop(neighborhood);

        task.process().handle_result(&mut context);
        let chunk = context.world.get().chunk(index).unwrap();
        assert!(chunk.get().is_built());
        assert_eq!(chunk.get().mesh().face_count(), 6);
    }
}
