//! # Chunk Iteration Module
//!
//! This module provides an iterator that walks every occupied cell of a chunk in
//! storage order: one horizontal layer at a time from y = 0 upward, and within a layer
//! z rows of x cells. Empty cells are skipped.

use cgmath::Point3;

use super::{CHUNK_LAYER_SIZE, CHUNK_WIDTH};
use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

/// An iterator over all occupied cells in a chunk.
///
/// Yields `(local_position, voxel_type)`. Positions are strictly increasing in
/// `(y, z, x)` order, so consumers can detect a layer change by watching `y`.
pub struct OccupiedVoxels<'a> {
    /// The chunk's cell storage
    voxels: &'a [Option<VoxelType>],
    /// Next offset into `voxels` to inspect
    current_offset: usize,
}

impl<'a> OccupiedVoxels<'a> {
    /// Creates a new iterator positioned before the first cell.
    pub(super) fn new(voxels: &'a [Option<VoxelType>]) -> Self {
        OccupiedVoxels {
            voxels,
            current_offset: 0,
        }
    }

    fn position_of(offset: usize) -> Point3<i32> {
        let y = offset / CHUNK_LAYER_SIZE;
        let in_layer = offset % CHUNK_LAYER_SIZE;
        Point3::new(
            (in_layer % CHUNK_WIDTH as usize) as i32,
            y as i32,
            (in_layer / CHUNK_WIDTH as usize) as i32,
        )
    }
}

impl Iterator for OccupiedVoxels<'_> {
    type Item = (Point3<i32>, VoxelType);

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_offset < self.voxels.len() {
            let offset = self.current_offset;
            self.current_offset += 1;
            if let Some(voxel_type) = self.voxels[offset] {
                return Some((Self::position_of(offset), voxel_type));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.voxels.len() - self.current_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Chunk, ChunkIndex, CHUNK_DEPTH, CHUNK_HEIGHT};
    use super::*;

    #[test]
    fn empty_chunk_yields_nothing() {
        let chunk = Chunk::new(ChunkIndex::new(0, 0));
        assert_eq!(chunk.occupied_voxels().next(), None);
    }

    #[test]
    fn positions_come_back_in_layer_order() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, 2, 0, Some(VoxelType::DIRT));
        chunk.set_voxel(0, 0, 7, Some(VoxelType::STONE));
        chunk.set_voxel(1, 0, 7, Some(VoxelType::SAND));
        chunk.set_voxel(
            CHUNK_WIDTH - 1,
            CHUNK_HEIGHT - 1,
            CHUNK_DEPTH - 1,
            Some(VoxelType::SNOW),
        );

        let visited: Vec<_> = chunk.occupied_voxels().collect();
        assert_eq!(
            visited,
            vec![
                (Point3::new(0, 0, 7), VoxelType::STONE),
                (Point3::new(1, 0, 7), VoxelType::SAND),
                (Point3::new(5, 2, 0), VoxelType::DIRT),
                (
                    Point3::new(CHUNK_WIDTH - 1, CHUNK_HEIGHT - 1, CHUNK_DEPTH - 1),
                    VoxelType::SNOW
                ),
            ]
        );
    }
}
