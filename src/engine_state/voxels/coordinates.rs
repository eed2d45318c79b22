//! Conversions between world space, the voxel grid, chunk indices and chunk-local cells.
//!
//! Voxel centres sit on integer multiples of [`BLOCK_SIZE`], so a world position maps
//! to the grid by rounding to nearest. Grid to chunk uses floor division and floor
//! modulo, so negative coordinates land in the chunk below zero rather than chunk 0.

use cgmath::Point3;

use super::chunk::{ChunkIndex, BLOCK_SIZE, CHUNK_DEPTH, CHUNK_WIDTH};

/// World-space scalar to grid coordinate.
#[inline]
pub fn world_to_grid(value: f32) -> i32 {
    (value / BLOCK_SIZE).round() as i32
}

/// Grid coordinate to world-space scalar (the voxel centre).
#[inline]
pub fn grid_to_world(value: i32) -> f32 {
    value as f32 * BLOCK_SIZE
}

/// World-space point to grid cell.
pub fn world_point_to_grid(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        world_to_grid(point.x),
        world_to_grid(point.y),
        world_to_grid(point.z),
    )
}

/// Grid cell to world-space point.
pub fn grid_point_to_world(grid: Point3<i32>) -> Point3<f32> {
    Point3::new(
        grid_to_world(grid.x),
        grid_to_world(grid.y),
        grid_to_world(grid.z),
    )
}

/// Index of the chunk owning grid column `(gx, gz)`.
#[inline]
pub fn grid_to_chunk_index(gx: i32, gz: i32) -> ChunkIndex {
    ChunkIndex::new(gx.div_euclid(CHUNK_WIDTH), gz.div_euclid(CHUNK_DEPTH))
}

/// Local `(x, z)` of grid column `(gx, gz)` inside its owning chunk.
#[inline]
pub fn grid_to_local(gx: i32, gz: i32) -> (i32, i32) {
    (gx.rem_euclid(CHUNK_WIDTH), gz.rem_euclid(CHUNK_DEPTH))
}

/// Index of the chunk containing a world-space point.
pub fn world_to_chunk_index(point: Point3<f32>) -> ChunkIndex {
    grid_to_chunk_index(world_to_grid(point.x), world_to_grid(point.z))
}
