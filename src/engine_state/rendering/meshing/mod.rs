//! Mesh generation for voxel chunks.
//!
//! This module turns a chunk's voxel grid into quad buffers with per-face culling.
//! Each occupied cell looks at its six face-adjacent cells, crossing into the
//! neighbouring chunks through a [`ChunkNeighborhood`] when needed, and emits a quad
//! for every face that can be seen.
//!
//! # Visibility
//! A face is emitted when any of these holds:
//! - the adjacent cell is empty
//! - either voxel is partially transparent (alpha-cut leaves and plants)
//! - the adjacent voxel is translucent and of a different type
//!
//! Cross-shaped voxels never emit TOP/BOTTOM, and no voxel emits BOTTOM on layer 0.
//! Adjacent chunks that do not exist yet read as BEDROCK, so no wall is drawn along
//! the edge of the generated world.
//!
//! # Threading
//! [`build_chunk_mesh`] only reads voxel data and yields once per horizontal layer,
//! so it can share a worker thread with other jobs.

use std::thread;

use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::chunk::neighborhood::ChunkNeighborhood;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;
use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

mod mesh;
mod renderer;

pub use mesh::*;
pub use renderer::*;

/// What a missing neighbour chunk reads as while meshing.
pub const EDGE_OF_WORLD_FALLBACK: Option<VoxelType> = Some(VoxelType::BEDROCK);

/// Decides whether `side` of a `voxel_type` cell on layer `y` is drawn, given the
/// contents of the cell it faces.
pub fn is_face_visible(
    voxel_type: VoxelType,
    side: VoxelSide,
    y: i32,
    neighbor: Option<VoxelType>,
) -> bool {
    if voxel_type.is_cross_shaped() && side.is_vertical() {
        return false;
    }
    if side == VoxelSide::BOTTOM && y == 0 {
        return false;
    }

    match neighbor {
        None => true,
        Some(neighbor) => {
            voxel_type.is_partially_transparent()
                || neighbor.is_partially_transparent()
                || (neighbor.is_translucent() && neighbor != voxel_type)
        }
    }
}

/// Builds the opaque and translucent quad buffers for `chunk`.
pub fn build_chunk_mesh(chunk: &Chunk, neighborhood: &ChunkNeighborhood<'_>) -> ChunkMesh {
    let start = Instant::now();
    let mut mesh = ChunkMesh::default();
    let mut current_layer = 0;

    for (position, voxel_type) in chunk.occupied_voxels() {
        if position.y != current_layer {
            current_layer = position.y;
            thread::yield_now();
        }

        let cross_shaped = voxel_type.is_cross_shaped();
        for side in VoxelSide::all() {
            let (dx, dy, dz) = side.offset();
            let neighbor = chunk.cross_chunk_voxel_at(
                neighborhood,
                position.x + dx,
                position.y + dy,
                position.z + dz,
                EDGE_OF_WORLD_FALLBACK,
            );
            if !is_face_visible(voxel_type, side, position.y, neighbor) {
                continue;
            }

            let face = if cross_shaped {
                Face::cross(position.x, position.y, position.z, voxel_type, side)
            } else {
                Face::cube(position.x, position.y, position.z, voxel_type, side)
            };
            mesh.push_face(&face);
        }
    }

    let index = chunk.index();
    debug!(
        "Meshed chunk ({}, {}): {} opaque + {} translucent faces in {:?}",
        index.i,
        index.j,
        mesh.opaque_face_count(),
        mesh.translucent_face_count(),
        start.elapsed()
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MtResource;
    use crate::engine_state::voxels::chunk::{
        ChunkIndex, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH,
    };

    fn mesh_isolated(chunk: &Chunk) -> ChunkMesh {
        build_chunk_mesh(chunk, &ChunkNeighborhood::isolated(chunk.index()))
    }

    #[test]
    fn opaque_against_bedrock_is_hidden() {
        for side in VoxelSide::all() {
            assert!(!is_face_visible(
                VoxelType::STONE,
                side,
                10,
                Some(VoxelType::BEDROCK)
            ));
        }
    }

    #[test]
    fn visibility_rule_cases() {
        let top = VoxelSide::TOP;
        assert!(is_face_visible(VoxelType::STONE, top, 5, None));
        assert!(!is_face_visible(VoxelType::WATER, top, 5, Some(VoxelType::WATER)));
        assert!(is_face_visible(VoxelType::STONE, top, 5, Some(VoxelType::WATER)));
        assert!(is_face_visible(VoxelType::WATER, top, 5, Some(VoxelType::GLASS)));
        assert!(!is_face_visible(VoxelType::WATER, top, 5, Some(VoxelType::STONE)));
        assert!(is_face_visible(VoxelType::LEAVES, top, 5, Some(VoxelType::LEAVES)));
        assert!(is_face_visible(VoxelType::STONE, top, 5, Some(VoxelType::LEAVES)));
        assert!(!is_face_visible(VoxelType::STONE, VoxelSide::BOTTOM, 0, None));
        assert!(!is_face_visible(VoxelType::RED_FLOWER, top, 5, None));
        assert!(!is_face_visible(
            VoxelType::RED_FLOWER,
            VoxelSide::BOTTOM,
            5,
            None
        ));
        assert!(is_face_visible(
            VoxelType::RED_FLOWER,
            VoxelSide::LEFT,
            5,
            Some(VoxelType::STONE)
        ));
    }

    #[test]
    fn lone_voxel_emits_six_faces() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(10, 10, 10, Some(VoxelType::STONE));
        let mesh = mesh_isolated(&chunk);
        assert_eq!(mesh.opaque_face_count(), 6);
        assert_eq!(mesh.translucent_face_count(), 0);
    }

    #[test]
    fn floor_layer_has_no_bottom_face() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(10, 0, 10, Some(VoxelType::STONE));
        assert_eq!(mesh_isolated(&chunk).opaque_face_count(), 5);
    }

    #[test]
    fn missing_neighbor_chunk_hides_the_edge_face() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(0, 10, 10, Some(VoxelType::STONE));
        assert_eq!(mesh_isolated(&chunk).opaque_face_count(), 5);
    }

    #[test]
    fn existing_empty_neighbor_shows_the_edge_face() {
        let west = MtResource::new(Chunk::new(ChunkIndex::new(-1, 0)));
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(0, 10, 10, Some(VoxelType::STONE));
        let neighborhood = ChunkNeighborhood::gather(chunk.index(), |index| {
            (index == ChunkIndex::new(-1, 0)).then(|| west.get())
        });
        assert_eq!(build_chunk_mesh(&chunk, &neighborhood).opaque_face_count(), 6);
    }

    #[test]
    fn full_isolated_chunk_only_shows_its_top() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_DEPTH {
                for x in 0..CHUNK_WIDTH {
                    chunk.set_voxel(x, y, z, Some(VoxelType::STONE));
                }
            }
        }
        let mesh = mesh_isolated(&chunk);
        assert_eq!(
            mesh.opaque_face_count(),
            (CHUNK_WIDTH * CHUNK_DEPTH) as usize
        );
    }

    #[test]
    fn adjacent_water_shares_no_internal_face() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, 5, 5, Some(VoxelType::WATER));
        chunk.set_voxel(6, 5, 5, Some(VoxelType::WATER));
        let mesh = mesh_isolated(&chunk);
        assert_eq!(mesh.translucent_face_count(), 10);
        assert_eq!(mesh.opaque_face_count(), 0);
    }

    #[test]
    fn water_against_glass_draws_both_sides() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, 5, 5, Some(VoxelType::WATER));
        chunk.set_voxel(6, 5, 5, Some(VoxelType::GLASS));
        assert_eq!(mesh_isolated(&chunk).translucent_face_count(), 12);
    }

    #[test]
    fn leaves_draw_shared_faces_on_both_sides() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, 5, 5, Some(VoxelType::LEAVES));
        chunk.set_voxel(6, 5, 5, Some(VoxelType::STONE));
        assert_eq!(mesh_isolated(&chunk).opaque_face_count(), 12);
    }

    #[test]
    fn cross_voxel_emits_four_opaque_quads() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, 1, 5, Some(VoxelType::TALL_GRASS));
        chunk.set_voxel(5, 0, 5, Some(VoxelType::DIRT));
        let mesh = mesh_isolated(&chunk);
        // Dirt: 4 sides + top (plant above is alpha-cut). Grass: 4 quads.
        assert_eq!(mesh.opaque_face_count(), 9);
    }
}
