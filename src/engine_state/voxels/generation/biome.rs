use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

/// Climate of one terrain column, deciding its surface and foliage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    /// Grassy hills with trees, flowers and mushrooms.
    NORMAL,
    /// Flat sand with cacti and dead bushes.
    DESERT,
    /// Frozen hills with pines and snow.
    WINTER,
    /// Shallow water over sand, with reeds.
    OCEAN,
}

impl Biome {
    /// Filler between the rock layer and the surface cell.
    pub fn subsurface(self) -> VoxelType {
        match self {
            Biome::NORMAL | Biome::WINTER => VoxelType::DIRT,
            Biome::OCEAN | Biome::DESERT => VoxelType::SAND,
        }
    }

    /// Whether the column was shaped as flat lowland.
    pub fn is_lowland(self) -> bool {
        matches!(self, Biome::OCEAN | Biome::DESERT)
    }
}

/// The pure, noise-derived shape of one terrain column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColumnProfile {
    /// Layer of the column's top cell.
    pub height: i32,
    /// Biome chosen for the column.
    pub biome: Biome,
    /// Type of the top cell.
    pub surface: VoxelType,
    /// Combined height noise `local * region`, before scaling.
    pub relief: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowland_biomes_fill_with_sand() {
        for biome in [Biome::NORMAL, Biome::DESERT, Biome::WINTER, Biome::OCEAN] {
            let sandy = biome.subsurface() == VoxelType::SAND;
            assert_eq!(sandy, biome.is_lowland(), "{biome:?}");
        }
    }
}
