//! # Voxel Module
//!
//! The voxel catalog: every voxel type's static properties and per-face texture atlas
//! cells. All lookups are pure table reads indexed by the type's id; there is no error
//! path because every `VoxelType` has a complete row.

use voxel_side::VoxelSide;
use voxel_type::{VoxelType, VOXEL_TYPE_COUNT};

pub mod voxel_side;
pub mod voxel_type;

/// The underlying integer type used to represent voxel types compactly.
pub type VoxelTypeSize = u8;

/// Width of the texture atlas image in pixels.
pub const ATLAS_SIZE_PX: u32 = 2048;
/// Number of cells along each edge of the atlas grid.
pub const ATLAS_CELLS_PER_ROW: u32 = 16;
/// The UV span of a single atlas cell.
pub const ATLAS_CELL_UV: f32 = 1.0 / ATLAS_CELLS_PER_ROW as f32;

/// Static properties shared by every voxel of one type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelProperties {
    /// Rendered into the translucent mesh buffer.
    pub translucent: bool,
    /// Alpha-cut texture; both sides of a shared face must be drawn.
    pub partially_transparent: bool,
    /// Blocks movement.
    pub solid: bool,
    /// Can be removed by the player.
    pub breakable: bool,
    /// Targeting passes through it.
    pub mine_through: bool,
    /// Two crossed quads instead of a cube.
    pub cross_shaped: bool,
    /// Removed when the cell below it is cleared.
    pub support_dependent: bool,
}

const OPAQUE_CUBE: VoxelProperties = VoxelProperties {
    translucent: false,
    partially_transparent: false,
    solid: true,
    breakable: true,
    mine_through: false,
    cross_shaped: false,
    support_dependent: false,
};

const UNBREAKABLE_CUBE: VoxelProperties = VoxelProperties {
    breakable: false,
    ..OPAQUE_CUBE
};

const LIQUID: VoxelProperties = VoxelProperties {
    translucent: true,
    solid: false,
    breakable: false,
    mine_through: true,
    ..OPAQUE_CUBE
};

const CLEAR_CUBE: VoxelProperties = VoxelProperties {
    translucent: true,
    ..OPAQUE_CUBE
};

const CUTOUT_CUBE: VoxelProperties = VoxelProperties {
    partially_transparent: true,
    ..OPAQUE_CUBE
};

const RESTING_CUBE: VoxelProperties = VoxelProperties {
    support_dependent: true,
    ..OPAQUE_CUBE
};

const PLANT: VoxelProperties = VoxelProperties {
    translucent: false,
    partially_transparent: true,
    solid: false,
    breakable: true,
    mine_through: true,
    cross_shaped: true,
    support_dependent: true,
};

/// Property rows, indexed by `VoxelType as usize`.
pub static VOXEL_PROPERTIES: [VoxelProperties; VOXEL_TYPE_COUNT] = [
    OPAQUE_CUBE,      // GRASS
    OPAQUE_CUBE,      // DIRT
    OPAQUE_CUBE,      // STONE
    UNBREAKABLE_CUBE, // BEDROCK
    OPAQUE_CUBE,      // SAND
    OPAQUE_CUBE,      // GRAVEL
    OPAQUE_CUBE,      // COBBLESTONE
    LIQUID,           // WATER
    CLEAR_CUBE,       // ICE
    CLEAR_CUBE,       // GLASS
    OPAQUE_CUBE,      // COAL_ORE
    OPAQUE_CUBE,      // IRON_ORE
    OPAQUE_CUBE,      // GOLD_ORE
    OPAQUE_CUBE,      // DIAMOND_ORE
    OPAQUE_CUBE,      // WOOD
    CUTOUT_CUBE,      // LEAVES
    OPAQUE_CUBE,      // PINE_WOOD
    CUTOUT_CUBE,      // PINE_LEAVES
    OPAQUE_CUBE,      // FROZEN_GRASS
    RESTING_CUBE,     // SNOW
    RESTING_CUBE,     // CACTUS
    PLANT,            // TALL_GRASS
    PLANT,            // RED_FLOWER
    PLANT,            // YELLOW_FLOWER
    PLANT,            // RED_MUSHROOM
    PLANT,            // BROWN_MUSHROOM
    PLANT,            // REED
    PLANT,            // DEAD_BUSH
];

/// A cell in the 16x16 texture atlas grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasCoordinate {
    /// Cell column, left to right.
    pub column: u8,
    /// Cell row, top to bottom.
    pub row: u8,
}

impl AtlasCoordinate {
    /// Creates an atlas coordinate.
    pub const fn new(column: u8, row: u8) -> Self {
        AtlasCoordinate { column, row }
    }

    /// UV of the cell's top-left corner.
    pub fn uv_origin(self) -> [f32; 2] {
        [
            self.column as f32 * ATLAS_CELL_UV,
            self.row as f32 * ATLAS_CELL_UV,
        ]
    }

    /// Maps a cell-local `(u, v)` in [0, 1] into atlas UV space.
    pub fn scale_uv(self, u: f32, v: f32) -> [f32; 2] {
        let [u0, v0] = self.uv_origin();
        [u0 + u * ATLAS_CELL_UV, v0 + v * ATLAS_CELL_UV]
    }
}

/// The "missing texture" cell, used for ids that do not name a voxel type.
pub const DEFAULT_ATLAS_COORDINATE: AtlasCoordinate = AtlasCoordinate::new(15, 15);

const fn uniform(column: u8, row: u8) -> [AtlasCoordinate; 6] {
    let cell = AtlasCoordinate::new(column, row);
    [cell; 6]
}

/// Per-face cells in [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT] order.
const fn columnar(
    side: AtlasCoordinate,
    bottom: AtlasCoordinate,
    top: AtlasCoordinate,
) -> [AtlasCoordinate; 6] {
    [side, side, bottom, top, side, side]
}

/// Maps each voxel type to its atlas cell for each face.
///
/// The outer array is indexed by `VoxelType as usize`, the inner one by `VoxelSide as usize`.
pub static VOXEL_TYPE_TO_ATLAS_COORDINATES: [[AtlasCoordinate; 6]; VOXEL_TYPE_COUNT] = [
    columnar(
        AtlasCoordinate::new(3, 0),
        AtlasCoordinate::new(2, 0),
        AtlasCoordinate::new(0, 0),
    ), // GRASS
    uniform(2, 0),  // DIRT
    uniform(1, 0),  // STONE
    uniform(1, 1),  // BEDROCK
    uniform(2, 1),  // SAND
    uniform(3, 1),  // GRAVEL
    uniform(0, 1),  // COBBLESTONE
    uniform(13, 12), // WATER
    uniform(3, 4),  // ICE
    uniform(1, 3),  // GLASS
    uniform(2, 2),  // COAL_ORE
    uniform(1, 2),  // IRON_ORE
    uniform(0, 2),  // GOLD_ORE
    uniform(2, 3),  // DIAMOND_ORE
    columnar(
        AtlasCoordinate::new(4, 1),
        AtlasCoordinate::new(5, 1),
        AtlasCoordinate::new(5, 1),
    ), // WOOD
    uniform(4, 3), // LEAVES
    columnar(
        AtlasCoordinate::new(4, 7),
        AtlasCoordinate::new(5, 1),
        AtlasCoordinate::new(5, 1),
    ), // PINE_WOOD
    uniform(4, 8), // PINE_LEAVES
    columnar(
        AtlasCoordinate::new(4, 4),
        AtlasCoordinate::new(2, 0),
        AtlasCoordinate::new(2, 4),
    ), // FROZEN_GRASS
    uniform(2, 4), // SNOW
    columnar(
        AtlasCoordinate::new(6, 4),
        AtlasCoordinate::new(7, 4),
        AtlasCoordinate::new(5, 4),
    ), // CACTUS
    uniform(7, 2),  // TALL_GRASS
    uniform(12, 0), // RED_FLOWER
    uniform(13, 0), // YELLOW_FLOWER
    uniform(12, 1), // RED_MUSHROOM
    uniform(13, 1), // BROWN_MUSHROOM
    uniform(9, 4),  // REED
    uniform(7, 3),  // DEAD_BUSH
];

/// Looks up the atlas cell for a raw voxel id.
///
/// Ids that do not name a voxel type resolve to [`DEFAULT_ATLAS_COORDINATE`] so a
/// corrupted id renders as the missing-texture cell instead of failing.
pub fn atlas_coordinate_for_id(id: VoxelTypeSize, side: VoxelSide) -> AtlasCoordinate {
    VoxelType::from_id(id)
        .map(|voxel_type| voxel_type.atlas_coordinate(side))
        .unwrap_or(DEFAULT_ATLAS_COORDINATE)
}
