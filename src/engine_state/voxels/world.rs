//! # World Module
//!
//! This module provides the `World` struct, the index of every chunk created so far
//! and the single entry point for world-space voxel queries.
//!
//! ## Architecture
//!
//! Chunks live in a sparse hash map keyed by `ChunkIndex`, each wrapped in an
//! `MtResource` so worker threads can read voxel data while the main thread owns all
//! writes. Chunks are never removed once registered.
//!
//! ## Coordinates
//!
//! World-space queries run the full chain: world -> grid (round) -> chunk index
//! (floor division) -> local cell (floor modulo). See the `coordinates` module.

use std::collections::HashMap;

use cgmath::{InnerSpace, Point3, Vector3};
use log::debug;

use super::chunk::neighborhood::ChunkNeighborhood;
use super::chunk::{BlockBreak, Chunk, ChunkIndex};
use super::coordinates::{
    grid_to_chunk_index, grid_to_local, grid_to_world, world_point_to_grid,
};
use super::voxel::voxel_type::VoxelType;
use crate::core::MtResource;
use crate::engine_state::error::WorldError;

/// Step length of the targeting ray march, in world units.
const TARGETING_STEP: f32 = 0.05;

/// Longest ray the targeting march will walk, in world units.
pub const MAX_TARGETING_REACH: f32 = 64.0;

/// The voxel a targeting ray stopped at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetedVoxel {
    /// Grid cell of the hit.
    pub grid: Point3<i32>,
    /// Type occupying the cell.
    pub voxel_type: VoxelType,
    /// Distance along the ray where the cell was entered.
    pub distance: f32,
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use voxel_world_engine::engine_state::voxels::chunk::{Chunk, ChunkIndex};
/// use voxel_world_engine::engine_state::voxels::world::World;
///
/// let mut world = World::new();
/// world.add_chunk(Chunk::new(ChunkIndex::new(0, 0))).unwrap();
/// assert!(world.add_chunk(Chunk::new(ChunkIndex::new(0, 0))).is_err());
/// assert!(world.chunk(ChunkIndex::new(0, 0)).is_some());
/// ```
#[derive(Default)]
pub struct World {
    /// A mapping from chunk index to chunk data.
    chunks: HashMap<ChunkIndex, MtResource<Chunk>>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Registers a chunk under its own index.
    ///
    /// # Errors
    /// [`WorldError::ChunkAlreadyRegistered`] if the index is taken. The existing chunk
    /// is left untouched.
    pub fn add_chunk(&mut self, chunk: Chunk) -> Result<MtResource<Chunk>, WorldError> {
        let index = chunk.index();
        if self.chunks.contains_key(&index) {
            return Err(WorldError::ChunkAlreadyRegistered { index });
        }

        let chunk = MtResource::new(chunk);
        self.chunks.insert(index, chunk.clone());
        debug!("Registered chunk ({}, {})", index.i, index.j);
        Ok(chunk)
    }

    /// Whether a chunk is registered at `index`.
    pub fn contains_chunk(&self, index: ChunkIndex) -> bool {
        self.chunks.contains_key(&index)
    }

    /// The chunk at `index`, if registered.
    pub fn chunk(&self, index: ChunkIndex) -> Option<MtResource<Chunk>> {
        self.chunks.get(&index).cloned()
    }

    /// Handles to the registered chunks among the eight around `index`.
    ///
    /// Cloning the handles lets a caller release its guard on the world before
    /// locking any chunk. See [`ChunkNeighborhood::from_handles`].
    pub fn neighbor_handles(&self, index: ChunkIndex) -> Vec<(ChunkIndex, MtResource<Chunk>)> {
        let mut handles = Vec::with_capacity(8);
        for dj in -1..=1 {
            for di in -1..=1 {
                if di == 0 && dj == 0 {
                    continue;
                }
                let neighbor = index.offset(di, dj);
                if let Some(chunk) = self.chunks.get(&neighbor) {
                    handles.push((neighbor, chunk.clone()));
                }
            }
        }
        handles
    }

    /// The chunk `(di, dj)` away from `index`, if registered.
    pub fn find_neighbor(&self, index: ChunkIndex, di: i32, dj: i32) -> Option<MtResource<Chunk>> {
        self.chunk(index.offset(di, dj))
    }

    /// Read guards over the eight chunks surrounding `index`.
    ///
    /// The centre chunk is not locked, so the caller may hold a write guard on it.
    pub fn neighborhood(&self, index: ChunkIndex) -> ChunkNeighborhood<'_> {
        ChunkNeighborhood::gather(index, |neighbor| {
            self.chunks.get(&neighbor).map(MtResource::get)
        })
    }

    /// Every registered index, sorted.
    pub fn chunk_indices(&self) -> Vec<ChunkIndex> {
        let mut indices: Vec<ChunkIndex> = self.chunks.keys().copied().collect();
        indices.sort();
        indices
    }

    /// Number of registered chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is registered.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Generated chunks whose mesh is stale, sorted.
    pub fn dirty_chunks(&self) -> Vec<ChunkIndex> {
        let mut dirty: Vec<ChunkIndex> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| {
                let chunk = chunk.get();
                chunk.is_generated() && chunk.is_dirty()
            })
            .map(|(index, _)| *index)
            .collect();
        dirty.sort();
        dirty
    }

    /// Sum of `(opaque, translucent)` faces over all live meshes.
    pub fn total_face_counts(&self) -> (usize, usize) {
        self.chunks.values().fold((0, 0), |(opaque, translucent), chunk| {
            let chunk = chunk.get();
            (
                opaque + chunk.mesh().opaque_face_count(),
                translucent + chunk.mesh().translucent_face_count(),
            )
        })
    }

    /// Marks the four face-adjacent generated chunks of `index` dirty.
    ///
    /// # Returns
    /// The indices that were marked.
    pub fn mark_neighbors_dirty(&self, index: ChunkIndex) -> Vec<ChunkIndex> {
        let mut marked = Vec::new();
        for (di, dj) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            if let Some(neighbor) = self.find_neighbor(index, di, dj) {
                let mut neighbor = neighbor.get_mut();
                if neighbor.is_generated() {
                    neighbor.mark_dirty();
                    marked.push(neighbor.index());
                }
            }
        }
        marked
    }

    /// Voxel at a grid cell, or `None` when empty or unregistered.
    pub fn voxel_at_grid(&self, grid: Point3<i32>) -> Option<VoxelType> {
        let chunk = self.chunks.get(&grid_to_chunk_index(grid.x, grid.z))?;
        let (x, z) = grid_to_local(grid.x, grid.z);
        chunk.get().voxel_at(x, grid.y, z)
    }

    /// Solid voxel at a grid cell.
    pub fn solid_voxel_at_grid(&self, grid: Point3<i32>) -> Option<VoxelType> {
        self.voxel_at_grid(grid)
            .filter(|voxel_type| voxel_type.is_solid())
    }

    /// Voxel at a world-space position.
    pub fn voxel_at(&self, position: Point3<f32>) -> Option<VoxelType> {
        self.voxel_at_grid(world_point_to_grid(position))
    }

    /// Solid voxel at a world-space position.
    pub fn solid_voxel_at(&self, position: Point3<f32>) -> Option<VoxelType> {
        self.solid_voxel_at_grid(world_point_to_grid(position))
    }

    /// World-space height of the first solid voxel at or below `position`.
    ///
    /// # Returns
    /// `0.0` if no chunk is registered there. When the column has no floor, the
    /// chunk-height sentinel converted to world space.
    pub fn depth_at(&self, position: Point3<f32>) -> f32 {
        let grid = world_point_to_grid(position);
        let Some(chunk) = self.chunks.get(&grid_to_chunk_index(grid.x, grid.z)) else {
            return 0.0;
        };
        let (x, z) = grid_to_local(grid.x, grid.z);
        grid_to_world(chunk.get().depth_at(x, grid.y, z))
    }

    /// Breaks the voxel at a world-space position. See [`World::remove_block_at_grid`].
    pub fn remove_block(&self, position: Point3<f32>) -> Option<BlockBreak> {
        self.remove_block_at_grid(world_point_to_grid(position))
    }

    /// Breaks the voxel at a grid cell, rebuilding and committing the owning chunk's mesh
    /// immediately, then marks affected neighbour chunks dirty.
    ///
    /// # Returns
    /// `None` when nothing was broken (unregistered chunk or empty cell).
    pub fn remove_block_at_grid(&self, grid: Point3<i32>) -> Option<BlockBreak> {
        let index = grid_to_chunk_index(grid.x, grid.z);
        let chunk = self.chunks.get(&index)?;
        let (x, z) = grid_to_local(grid.x, grid.z);

        let outcome = {
            let neighborhood = self.neighborhood(index);
            let mut chunk = chunk.get_mut();
            chunk.break_block(x, grid.y, z, &neighborhood)
        }?;

        for (di, dj) in &outcome.neighbors_to_dirty {
            if let Some(neighbor) = self.find_neighbor(index, *di, *dj) {
                neighbor.get_mut().mark_dirty();
            }
        }

        debug!(
            "Broke {} voxel(s) at ({}, {}, {}) in chunk ({}, {})",
            outcome.removed.len(),
            grid.x,
            grid.y,
            grid.z,
            index.i,
            index.j
        );
        Some(outcome)
    }

    /// Marches a ray from `origin` along `direction` and returns the first voxel that is
    /// not mine-through, within `reach` world units.
    ///
    /// `reach` is capped at [`MAX_TARGETING_REACH`]. A NaN or non-positive reach
    /// targets nothing.
    pub fn first_targeted_voxel(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        reach: f32,
    ) -> Option<TargetedVoxel> {
        if direction.magnitude2() == 0.0 || reach.is_nan() || reach <= 0.0 {
            return None;
        }
        let direction = direction.normalize();
        let steps = (reach.min(MAX_TARGETING_REACH) / TARGETING_STEP) as u32;

        let mut last_cell = None;
        for step in 0..=steps {
            let distance = step as f32 * TARGETING_STEP;
            let cell = world_point_to_grid(origin + direction * distance);
            if last_cell != Some(cell) {
                last_cell = Some(cell);
                if let Some(voxel_type) = self.voxel_at_grid(cell) {
                    if !voxel_type.is_mine_through() {
                        return Some(TargetedVoxel {
                            grid: cell,
                            voxel_type,
                            distance,
                        });
                    }
                }
            }
        }
        None
    }
}
