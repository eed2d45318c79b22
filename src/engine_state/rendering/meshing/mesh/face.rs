use cgmath::Point3;

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::chunk::BLOCK_SIZE;
use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;
use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corners in cell-corner units (a voxel at `(x, y, z)`
/// spans `x..x + 1` and so on). Seen from the side the face is visible from, `ll`,
/// `ul`, `ur`, `lr` run clockwise starting at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner
    pub ll: Point3<f32>,
    /// Upper-left corner
    pub ul: Point3<f32>,
    /// Upper-right corner
    pub ur: Point3<f32>,
    /// Lower-right corner
    pub lr: Point3<f32>,
    /// The voxel type, used for texture lookup and buffer selection
    pub voxel_type: VoxelType,
    /// Which side of the voxel this face represents
    pub side: VoxelSide,
}

impl Face {
    /// Creates the cube face of the voxel at local `(x, y, z)` on `side`.
    pub fn cube(x: i32, y: i32, z: i32, voxel_type: VoxelType, side: VoxelSide) -> Self {
        let (x, y, z) = (x as f32, y as f32, z as f32);
        let p = Point3::new;
        let [ll, ul, ur, lr] = match side {
            VoxelSide::FRONT => [
                p(x, y, z + 1.0),
                p(x, y + 1.0, z + 1.0),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x + 1.0, y, z + 1.0),
            ],
            VoxelSide::BACK => [
                p(x + 1.0, y, z),
                p(x + 1.0, y + 1.0, z),
                p(x, y + 1.0, z),
                p(x, y, z),
            ],
            VoxelSide::RIGHT => [
                p(x + 1.0, y, z + 1.0),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x + 1.0, y + 1.0, z),
                p(x + 1.0, y, z),
            ],
            VoxelSide::LEFT => [
                p(x, y, z),
                p(x, y + 1.0, z),
                p(x, y + 1.0, z + 1.0),
                p(x, y, z + 1.0),
            ],
            VoxelSide::TOP => [
                p(x, y + 1.0, z + 1.0),
                p(x, y + 1.0, z),
                p(x + 1.0, y + 1.0, z),
                p(x + 1.0, y + 1.0, z + 1.0),
            ],
            VoxelSide::BOTTOM => [
                p(x, y, z),
                p(x, y, z + 1.0),
                p(x + 1.0, y, z + 1.0),
                p(x + 1.0, y, z),
            ],
        };
        Face {
            ll,
            ul,
            ur,
            lr,
            voxel_type,
            side,
        }
    }

    /// Creates one of the two diagonal planes of a cross-shaped voxel.
    ///
    /// FRONT and BACK are the two windings of the `(x, z) -> (x + 1, z + 1)` diagonal,
    /// LEFT and RIGHT the two windings of `(x + 1, z) -> (x, z + 1)`.
    ///
    /// # Panics
    /// On TOP or BOTTOM. Cross-shaped voxels have no horizontal faces, so the caller
    /// asking for one is a logic error.
    pub fn cross(x: i32, y: i32, z: i32, voxel_type: VoxelType, side: VoxelSide) -> Self {
        let (x, y, z) = (x as f32, y as f32, z as f32);
        let p = Point3::new;
        let [ll, ul, ur, lr] = match side {
            VoxelSide::FRONT => [
                p(x, y, z),
                p(x, y + 1.0, z),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x + 1.0, y, z + 1.0),
            ],
            VoxelSide::BACK => [
                p(x + 1.0, y, z + 1.0),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x, y + 1.0, z),
                p(x, y, z),
            ],
            VoxelSide::LEFT => [
                p(x + 1.0, y, z),
                p(x + 1.0, y + 1.0, z),
                p(x, y + 1.0, z + 1.0),
                p(x, y, z + 1.0),
            ],
            VoxelSide::RIGHT => [
                p(x, y, z + 1.0),
                p(x, y + 1.0, z + 1.0),
                p(x + 1.0, y + 1.0, z),
                p(x + 1.0, y, z),
            ],
            VoxelSide::TOP | VoxelSide::BOTTOM => {
                unreachable!("cross-shaped {voxel_type:?} has no {side:?} face")
            }
        };
        Face {
            ll,
            ul,
            ur,
            lr,
            voxel_type,
            side,
        }
    }

    /// The four vertices in `ll, ul, ur, lr` order.
    ///
    /// Corners are shifted by half a cell so the voxel centre lands on its grid point,
    /// scaled by the block size, and textured with the side's atlas cell.
    pub fn vertices(&self) -> [Vertex; 4] {
        let atlas = self.voxel_type.atlas_coordinate(self.side);
        let corner = |point: Point3<f32>, u: f32, v: f32| {
            Vertex::new(
                [
                    (point.x - 0.5) * BLOCK_SIZE,
                    (point.y - 0.5) * BLOCK_SIZE,
                    (point.z - 0.5) * BLOCK_SIZE,
                ],
                atlas.scale_uv(u, v),
            )
        };
        [
            corner(self.ll, 0.0, 1.0),
            corner(self.ul, 0.0, 0.0),
            corner(self.ur, 1.0, 0.0),
            corner(self.lr, 1.0, 1.0),
        ]
    }
}
