//! Ore veins and foliage templates written into a chunk after the terrain fill.
//!
//! Everything here consumes the generator's shared random stream, so results depend
//! on call order as well as on the seed.

use fastrand::Rng;

use crate::engine_state::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_WIDTH};
use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;
use crate::engine_state::voxels::voxel::voxel_type::VoxelType;

/// A structure as `(dx, dy, dz, voxel)` offsets from its base cell.
pub type Template = Vec<(i32, i32, i32, VoxelType)>;

/// One kind of ore: the deepest layer it may start below, and its per-cell chance.
#[derive(Copy, Clone, Debug)]
pub struct OreRule {
    pub ore: VoxelType,
    /// Veins only start on layers strictly below this one.
    pub max_layer: i32,
    pub chance: f64,
}

/// Ore trials in the order they are rolled.
pub const ORE_RULES: [OreRule; 4] = [
    OreRule {
        ore: VoxelType::DIAMOND_ORE,
        max_layer: 12,
        chance: 0.0008,
    },
    OreRule {
        ore: VoxelType::GOLD_ORE,
        max_layer: 24,
        chance: 0.0015,
    },
    OreRule {
        ore: VoxelType::IRON_ORE,
        max_layer: i32::MAX,
        chance: 0.004,
    },
    OreRule {
        ore: VoxelType::COAL_ORE,
        max_layer: i32::MAX,
        chance: 0.008,
    },
];

/// Longest vein, in cells.
pub const MAX_VEIN_LENGTH: usize = 8;

/// Rolls the ore trials for a stone cell on layer `y`.
///
/// Trials run in [`ORE_RULES`] order and stop at the first hit. Rules whose depth
/// limit excludes `y` do not consume the stream.
pub fn roll_ore(rng: &mut Rng, y: i32) -> Option<VoxelType> {
    ORE_RULES
        .iter()
        .filter(|rule| y < rule.max_layer)
        .find(|rule| rng.f64() < rule.chance)
        .map(|rule| rule.ore)
}

/// Random-walks from `(x, y, z)` for up to `length` steps, turning STONE into `ore`.
///
/// The walk stops when it leaves the chunk. Non-stone cells are stepped over
/// unchanged.
///
/// # Returns
/// The number of cells converted.
pub fn grow_vein(
    chunk: &mut Chunk,
    rng: &mut Rng,
    (mut x, mut y, mut z): (i32, i32, i32),
    ore: VoxelType,
    length: usize,
) -> usize {
    let mut placed = 0;
    for _ in 0..length {
        if !Chunk::in_bounds(x, y, z) {
            break;
        }
        if chunk.voxel_at(x, y, z) == Some(VoxelType::STONE) {
            chunk.set_voxel(x, y, z, Some(ore));
            placed += 1;
        }
        let (dx, dy, dz) = VoxelSide::all()[rng.usize(0..6)].offset();
        x += dx;
        y += dy;
        z += dz;
    }
    placed
}

/// Oak: four-cell trunk under a rounded leaf canopy.
pub fn oak_tree() -> Template {
    let mut template: Template = (0..4).map(|dy| (0, dy, 0, VoxelType::WOOD)).collect();
    for dy in 2..=3 {
        for dx in -2..=2_i32 {
            for dz in -2..=2_i32 {
                let corner = dx.abs() == 2 && dz.abs() == 2;
                if (dx, dz) != (0, 0) && !corner {
                    template.push((dx, dy, dz, VoxelType::LEAVES));
                }
            }
        }
    }
    for dx in -1..=1 {
        for dz in -1..=1 {
            if (dx, dz) != (0, 0) {
                template.push((dx, 4, dz, VoxelType::LEAVES));
            }
        }
    }
    template.push((0, 4, 0, VoxelType::LEAVES));
    template.extend(
        [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dz)| (dx, 5, dz, VoxelType::LEAVES)),
    );
    template
}

/// Pine: five-cell trunk under a narrowing cone of needles.
pub fn pine_tree() -> Template {
    let mut template: Template = (0..5).map(|dy| (0, dy, 0, VoxelType::PINE_WOOD)).collect();
    let rings: [(i32, i32); 3] = [(2, 2), (3, 1), (4, 1)];
    for (dy, radius) in rings {
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let in_cone = dx.abs() + dz.abs() <= radius;
                if (dx, dz) != (0, 0) && in_cone {
                    template.push((dx, dy, dz, VoxelType::PINE_LEAVES));
                }
            }
        }
    }
    template.push((0, 5, 0, VoxelType::PINE_LEAVES));
    template.push((0, 6, 0, VoxelType::PINE_LEAVES));
    template
}

/// A vertical stack of `height` cells of one type (cactus, reeds).
pub fn stack(voxel_type: VoxelType, height: i32) -> Template {
    (0..height).map(|dy| (0, dy, 0, voxel_type)).collect()
}

fn shift_inward(value: i32, extent: i32) -> i32 {
    if value == 0 {
        1
    } else if value == extent - 1 {
        extent - 2
    } else {
        value
    }
}

/// Writes `template` with its base at local `(x, y, z)`.
///
/// A base on the chunk's X or Z edge is moved one cell inward first. Cells that
/// still fall outside the chunk are dropped. If any remaining target holds BEDROCK
/// nothing is written; every other cell is overwritten unconditionally.
///
/// # Returns
/// `false` when the template was skipped.
pub fn place_template(chunk: &mut Chunk, x: i32, y: i32, z: i32, template: &[(i32, i32, i32, VoxelType)]) -> bool {
    let x = shift_inward(x, CHUNK_WIDTH);
    let z = shift_inward(z, CHUNK_DEPTH);

    let targets: Vec<(i32, i32, i32, VoxelType)> = template
        .iter()
        .map(|(dx, dy, dz, voxel_type)| (x + dx, y + dy, z + dz, *voxel_type))
        .filter(|(x, y, z, _)| Chunk::in_bounds(*x, *y, *z))
        .collect();

    if targets
        .iter()
        .any(|(x, y, z, _)| chunk.voxel_at(*x, *y, *z) == Some(VoxelType::BEDROCK))
    {
        return false;
    }

    for (x, y, z, voxel_type) in targets {
        chunk.set_voxel(x, y, z, Some(voxel_type));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkIndex, CHUNK_HEIGHT};

    fn stone_chunk(layers: i32) -> Chunk {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        for y in 0..layers {
            for z in 0..CHUNK_DEPTH {
                for x in 0..CHUNK_WIDTH {
                    chunk.set_voxel(x, y, z, Some(VoxelType::STONE));
                }
            }
        }
        chunk
    }

    #[test]
    fn veins_only_replace_stone() {
        let mut chunk = stone_chunk(10);
        chunk.set_voxel(5, 5, 5, Some(VoxelType::DIRT));
        let mut rng = Rng::with_seed(3);
        let placed = grow_vein(&mut chunk, &mut rng, (5, 5, 6), VoxelType::IRON_ORE, MAX_VEIN_LENGTH);
        assert!((1..=MAX_VEIN_LENGTH).contains(&placed));
        assert_eq!(chunk.voxel_at(5, 5, 5).map(|v| v == VoxelType::IRON_ORE), Some(false));
        let ore_cells = chunk
            .occupied_voxels()
            .filter(|(_, v)| *v == VoxelType::IRON_ORE)
            .count();
        assert_eq!(ore_cells, placed);
    }

    #[test]
    fn veins_stop_at_the_chunk_edge() {
        let mut chunk = stone_chunk(1);
        let mut rng = Rng::with_seed(11);
        let placed = grow_vein(&mut chunk, &mut rng, (0, -1, 0), VoxelType::COAL_ORE, 8);
        assert_eq!(placed, 0);
    }

    #[test]
    fn deep_ores_are_never_rolled_high_up() {
        let mut rng = Rng::with_seed(99);
        for _ in 0..20_000 {
            let ore = roll_ore(&mut rng, 40);
            assert_ne!(ore, Some(VoxelType::DIAMOND_ORE));
            assert_ne!(ore, Some(VoxelType::GOLD_ORE));
        }
    }

    #[test]
    fn ore_rolls_are_reproducible() {
        let mut a = Rng::with_seed(5);
        let mut b = Rng::with_seed(5);
        let rolls_a: Vec<_> = (0..5000).map(|n| roll_ore(&mut a, n % 30)).collect();
        let rolls_b: Vec<_> = (0..5000).map(|n| roll_ore(&mut b, n % 30)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().any(Option::is_some));
    }

    #[test]
    fn ore_trials_stop_at_the_first_hit() {
        let applicable: Vec<_> = ORE_RULES.iter().filter(|rule| 5 < rule.max_layer).collect();
        let mut rng = Rng::with_seed(42);
        let mut hits = 0;
        for _ in 0..20_000 {
            let before = rng.clone();
            let ore = roll_ore(&mut rng, 5);

            let mut replay = before;
            let mut expected = None;
            for rule in &applicable {
                if replay.f64() < rule.chance {
                    expected = Some(rule.ore);
                    break;
                }
            }
            assert_eq!(ore, expected);
            // Both streams consumed the same number of draws.
            assert_eq!(rng.clone().u64(..), replay.u64(..));
            hits += usize::from(ore.is_some());
        }
        assert!(hits > 0);
    }

    #[test]
    fn edge_templates_shift_inward() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        assert!(place_template(&mut chunk, 0, 10, CHUNK_DEPTH - 1, &stack(VoxelType::CACTUS, 2)));
        assert_eq!(chunk.voxel_at(1, 10, CHUNK_DEPTH - 2), Some(VoxelType::CACTUS));
        assert_eq!(chunk.voxel_at(1, 11, CHUNK_DEPTH - 2), Some(VoxelType::CACTUS));
        assert_eq!(chunk.voxel_at(0, 10, CHUNK_DEPTH - 1), None);
    }

    #[test]
    fn templates_touching_bedrock_are_skipped() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(6, 3, 5, Some(VoxelType::BEDROCK));
        assert!(!place_template(&mut chunk, 5, 1, 5, &oak_tree()));
        assert_eq!(chunk.occupied_voxels().count(), 1);
    }

    #[test]
    fn templates_overwrite_everything_else_and_clip_at_the_ceiling() {
        let mut chunk = Chunk::new(ChunkIndex::new(0, 0));
        chunk.set_voxel(5, CHUNK_HEIGHT - 2, 5, Some(VoxelType::DIRT));
        assert!(place_template(&mut chunk, 5, CHUNK_HEIGHT - 2, 5, &pine_tree()));
        assert_eq!(chunk.voxel_at(5, CHUNK_HEIGHT - 2, 5), Some(VoxelType::PINE_WOOD));
        assert_eq!(chunk.voxel_at(5, CHUNK_HEIGHT - 1, 5), Some(VoxelType::PINE_WOOD));
        assert_eq!(chunk.occupied_voxels().count(), 2);
    }

    #[test]
    fn tree_templates_have_a_trunk_at_the_base() {
        for template in [oak_tree(), pine_tree()] {
            assert!(template
                .iter()
                .any(|(dx, dy, dz, v)| (*dx, *dy, *dz) == (0, 0, 0) && !v.is_partially_transparent()));
        }
    }
}
