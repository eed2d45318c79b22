//! # Voxel Side Module
//!
//! This module defines the six faces of a voxel cell and the neighbour offset each
//! face looks through when the mesher decides whether the face is visible.

/// Represents the six possible faces of a voxel.
///
/// Each variant is assigned a unique integer value so it can index per-face tables
/// such as the atlas coordinates in the voxel catalog.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl VoxelSide {
    /// Returns an array containing all six faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [VoxelSide; 6] {
        [
            VoxelSide::FRONT,
            VoxelSide::BACK,
            VoxelSide::BOTTOM,
            VoxelSide::TOP,
            VoxelSide::LEFT,
            VoxelSide::RIGHT,
        ]
    }

    /// The four faces a cross-shaped voxel emits.
    pub fn sides() -> [VoxelSide; 4] {
        [
            VoxelSide::FRONT,
            VoxelSide::BACK,
            VoxelSide::LEFT,
            VoxelSide::RIGHT,
        ]
    }

    /// Offset `(dx, dy, dz)` to the cell this face touches.
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            VoxelSide::FRONT => (0, 0, 1),
            VoxelSide::BACK => (0, 0, -1),
            VoxelSide::BOTTOM => (0, -1, 0),
            VoxelSide::TOP => (0, 1, 0),
            VoxelSide::LEFT => (-1, 0, 0),
            VoxelSide::RIGHT => (1, 0, 0),
        }
    }

    /// Whether this is the TOP or BOTTOM face.
    pub fn is_vertical(self) -> bool {
        matches!(self, VoxelSide::TOP | VoxelSide::BOTTOM)
    }
}
