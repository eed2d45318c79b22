//! # Voxel Type Module
//!
//! This module defines the closed set of voxel types that can occupy a cell of the world,
//! along with id conversion and the property queries backed by the catalog tables in the
//! parent module.
//!
//! An empty cell is never a `VoxelType`: chunks store `Option<VoxelType>` and use `None`
//! for absence.

use num_derive::FromPrimitive;

use super::{
    AtlasCoordinate, VoxelProperties, VoxelTypeSize, VOXEL_PROPERTIES,
    VOXEL_TYPE_TO_ATLAS_COORDINATES,
};
use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;

/// Number of variants in [`VoxelType`].
pub const VOXEL_TYPE_COUNT: usize = 28;

/// Enumerates all voxel types in the world.
///
/// The discriminants are contiguous from zero and index the catalog tables.
/// `FromPrimitive` allows checked conversion from the compact `VoxelTypeSize` id.
#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum VoxelType {
    /// Grass-topped soil, the NORMAL biome surface.
    GRASS = 0,
    /// Plain soil below grass.
    DIRT,
    /// Rock layer filler and ore host.
    STONE,
    /// Unbreakable world floor.
    BEDROCK,
    /// Desert and beach surface.
    SAND,
    /// Loose rock.
    GRAVEL,
    /// Placed rock.
    COBBLESTONE,
    /// Ocean surface. Translucent, walk-through.
    WATER,
    /// Frozen water. Translucent but solid.
    ICE,
    /// Clear glass. Translucent but solid.
    GLASS,
    /// Most common ore.
    COAL_ORE,
    /// Common ore.
    IRON_ORE,
    /// Deep ore.
    GOLD_ORE,
    /// Deepest and rarest ore.
    DIAMOND_ORE,
    /// Oak trunk.
    WOOD,
    /// Oak canopy, alpha-cut texture.
    LEAVES,
    /// Pine trunk.
    PINE_WOOD,
    /// Pine canopy, alpha-cut texture.
    PINE_LEAVES,
    /// WINTER biome surface.
    FROZEN_GRASS,
    /// Snow cap resting on the block below.
    SNOW,
    /// Desert plant, stacked on sand.
    CACTUS,
    /// Cross-shaped grass tuft.
    TALL_GRASS,
    /// Cross-shaped flower.
    RED_FLOWER,
    /// Cross-shaped flower.
    YELLOW_FLOWER,
    /// Cross-shaped mushroom.
    RED_MUSHROOM,
    /// Cross-shaped mushroom.
    BROWN_MUSHROOM,
    /// Cross-shaped reed growing on ocean sand.
    REED,
    /// Cross-shaped dry shrub.
    DEAD_BUSH,
}

impl VoxelType {
    /// Returns the compact id of this type.
    pub fn id(self) -> VoxelTypeSize {
        self as VoxelTypeSize
    }

    /// Converts a compact id back into a `VoxelType`.
    ///
    /// # Returns
    /// `None` if `id` does not name a variant.
    pub fn from_id(id: VoxelTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Iterates every variant in id order.
    pub fn all() -> impl Iterator<Item = VoxelType> {
        (0..VOXEL_TYPE_COUNT as VoxelTypeSize).filter_map(VoxelType::from_id)
    }

    /// Returns the static property row of this type.
    #[inline]
    pub fn properties(self) -> &'static VoxelProperties {
        &VOXEL_PROPERTIES[self as usize]
    }

    /// Rendered into the translucent buffer (water, ice, glass).
    #[inline]
    pub fn is_translucent(self) -> bool {
        self.properties().translucent
    }

    /// Uses an alpha-cut texture, so faces behind it may show through.
    #[inline]
    pub fn is_partially_transparent(self) -> bool {
        self.properties().partially_transparent
    }

    /// Participates in collision.
    #[inline]
    pub fn is_solid(self) -> bool {
        self.properties().solid
    }

    /// Can be removed by the player.
    #[inline]
    pub fn is_breakable(self) -> bool {
        self.properties().breakable
    }

    /// Targeting rays pass through this type.
    #[inline]
    pub fn is_mine_through(self) -> bool {
        self.properties().mine_through
    }

    /// Rendered as two crossed quads instead of a cube.
    #[inline]
    pub fn is_cross_shaped(self) -> bool {
        self.properties().cross_shaped
    }

    /// Destroyed when the voxel below it is removed.
    #[inline]
    pub fn is_support_dependent(self) -> bool {
        self.properties().support_dependent
    }

    /// Atlas cell used for the given face.
    #[inline]
    pub fn atlas_coordinate(self, side: VoxelSide) -> AtlasCoordinate {
        VOXEL_TYPE_TO_ATLAS_COORDINATES[self as usize][side as usize]
    }
}
