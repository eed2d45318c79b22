//! # World Generation
//!
//! Procedural terrain for one chunk at a time, driven by five seeded Perlin fields:
//!
//! | field      | seed offset | used for                                   |
//! |------------|-------------|--------------------------------------------|
//! | local      | 0           | per-block height variation                 |
//! | region     | 1000        | chunk-scale elevation regions              |
//! | block type | 2000        | ocean water/sand, winter surface variants  |
//! | biome      | 3000        | biome selection                            |
//! | cavern     | 4000        | 3D cave carving                            |
//!
//! Generation runs in two passes. The first is a pure function of absolute block
//! coordinates: column height, biome, vertical fill and cavern carving. The second
//! scans the chunk in y, x, z order and draws from one seeded random stream for ore
//! veins and foliage, so its output also depends on the order chunks are generated in.

use std::sync::{Mutex, PoisonError};

use fastrand::Rng;
use log::debug;
use web_time::Instant;

use super::chunk::{Chunk, ChunkIndex, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};
use super::voxel::voxel_type::VoxelType;
use biome::{Biome, ColumnProfile};
use features::{grow_vein, place_template, roll_ore, MAX_VEIN_LENGTH};
use noise_generator::NoiseGenerator;

pub mod biome;
pub mod features;
pub mod noise_generator;

/// Layers of bedrock at the bottom of every column.
pub const BEDROCK_LAYER_HEIGHT: i32 = 1;
/// Layers of stone above the bedrock.
pub const ROCK_LAYER_HEIGHT: i32 = 30;
/// Highest layer filled with stone.
pub const ROCK_TOP: i32 = BEDROCK_LAYER_HEIGHT + ROCK_LAYER_HEIGHT - 1;
/// Scale applied to `local * region` noise.
pub const HEIGHT_FACTOR: f64 = 150.0;
/// Upper bound of the terrain added above the rock layer.
pub const MAX_HEIGHT_DELTA: i32 = 38;
/// Layers always left empty under the chunk ceiling.
pub const CEILING_HEADROOM: i32 = 12;
/// Below this `|local * region|` the column is flat lowland.
pub const LOW_RELIEF_THRESHOLD: f64 = 0.015;
/// Lowland columns with `|biome| <` this become ocean, the rest desert.
pub const OCEAN_CUTOFF: f64 = 0.2;
/// Hilly columns with `|biome| >` this become winter, the rest normal.
pub const WINTER_CUTOFF: f64 = 0.45;
/// Layers the ocean floor sits below the lowest land surface.
pub const OCEAN_DEPTH: i32 = 3;
/// Minimum desert height above the lowest land surface.
pub const DESERT_FLOOR: i32 = 2;
/// Normalised cavern noise below this empties the cell.
pub const CAVERN_THRESHOLD: f64 = 0.3;

const LOCAL_SEED_OFFSET: u32 = 0;
const REGION_SEED_OFFSET: u32 = 1000;
const BLOCK_TYPE_SEED_OFFSET: u32 = 2000;
const BIOME_SEED_OFFSET: u32 = 3000;
const CAVERN_SEED_OFFSET: u32 = 4000;

const LOCAL_FREQUENCY: f64 = 0.031;
/// Cycles per chunk width. See [`WorldGenerator::region_factor`].
const REGION_FREQUENCY: f64 = 0.37;
const BLOCK_TYPE_FREQUENCY: f64 = 0.11;
const BIOME_FREQUENCY: f64 = 0.0073;
const CAVERN_FREQUENCY: f64 = 0.083;

/// Lowest surface a land column can have.
const LAND_BASE: i32 = ROCK_TOP + 1;
/// Highest layer a column's top cell may occupy.
const MAX_SURFACE: i32 = CHUNK_HEIGHT - CEILING_HEADROOM;

// Foliage chances, rolled once per surface cell.
const OAK_CHANCE: f64 = 0.012;
const TALL_GRASS_CHANCE: f64 = 0.08;
const FLOWER_CHANCE: f64 = 0.02;
const MUSHROOM_CHANCE: f64 = 0.006;
const PINE_CHANCE: f64 = 0.015;
const SNOW_CHANCE: f64 = 0.6;
const REED_CHANCE: f64 = 0.05;
const CACTUS_CHANCE: f64 = 0.01;
const DEAD_BUSH_CHANCE: f64 = 0.012;

/// Generates chunk contents from a base seed.
pub struct WorldGenerator {
    seed: u32,
    local_height: NoiseGenerator,
    region_height: NoiseGenerator,
    block_type: NoiseGenerator,
    biome: NoiseGenerator,
    cavern: NoiseGenerator,
    /// Shared stream for ores and foliage.
    rng: Mutex<Rng>,
}

impl WorldGenerator {
    /// Creates a generator whose fields are seeded `seed + offset`.
    pub fn new(seed: u32) -> Self {
        WorldGenerator {
            seed,
            local_height: NoiseGenerator::new(seed.wrapping_add(LOCAL_SEED_OFFSET), LOCAL_FREQUENCY),
            region_height: NoiseGenerator::new(
                seed.wrapping_add(REGION_SEED_OFFSET),
                REGION_FREQUENCY,
            ),
            block_type: NoiseGenerator::new(
                seed.wrapping_add(BLOCK_TYPE_SEED_OFFSET),
                BLOCK_TYPE_FREQUENCY,
            ),
            biome: NoiseGenerator::new(seed.wrapping_add(BIOME_SEED_OFFSET), BIOME_FREQUENCY),
            cavern: NoiseGenerator::new(seed.wrapping_add(CAVERN_SEED_OFFSET), CAVERN_FREQUENCY),
            rng: Mutex::new(Rng::with_seed(seed as u64)),
        }
    }

    /// The base seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Height, biome and surface of the column at grid `(gx, gz)`.
    ///
    /// Pure: depends only on the seed and the coordinates.
    pub fn column_profile(&self, gx: i32, gz: i32) -> ColumnProfile {
        let (x, z) = (gx as f64, gz as f64);
        let local = self.local_height.sample_2d(x, z);
        let relief = local * self.region_factor(gx, gz);

        let height_delta = ((HEIGHT_FACTOR * relief).abs() as i32).clamp(1, MAX_HEIGHT_DELTA);
        let mut height = (LAND_BASE + height_delta).min(MAX_SURFACE);

        let biome_noise = self.biome.sample_2d(x, z).abs();
        let biome = if relief.abs() < LOW_RELIEF_THRESHOLD {
            if biome_noise < OCEAN_CUTOFF {
                height = LAND_BASE - OCEAN_DEPTH;
                Biome::OCEAN
            } else {
                height = height.max(LAND_BASE + DESERT_FLOOR);
                Biome::DESERT
            }
        } else if biome_noise > WINTER_CUTOFF {
            Biome::WINTER
        } else {
            Biome::NORMAL
        };

        ColumnProfile {
            height,
            biome,
            surface: self.surface_for(biome, x, z),
            relief,
        }
    }

    /// Region elevation at grid `(gx, gz)`, in [-1, 1].
    ///
    /// The field is sampled continuously at fractional chunk coordinates rather than
    /// once per chunk, so relief changes gradually across chunk borders.
    pub fn region_factor(&self, gx: i32, gz: i32) -> f64 {
        self.region_height.sample_2d(
            gx as f64 / CHUNK_WIDTH as f64,
            gz as f64 / CHUNK_DEPTH as f64,
        )
    }

    fn surface_for(&self, biome: Biome, x: f64, z: f64) -> VoxelType {
        match biome {
            Biome::NORMAL => VoxelType::GRASS,
            Biome::DESERT => VoxelType::SAND,
            Biome::OCEAN => {
                if self.block_type.sample_2d(x, z) > 0.0 {
                    VoxelType::WATER
                } else {
                    VoxelType::SAND
                }
            }
            Biome::WINTER => {
                let variant = self.block_type.normalized_2d(x, z);
                if variant < 0.3 {
                    VoxelType::ICE
                } else if variant > 0.75 {
                    VoxelType::SAND
                } else {
                    VoxelType::FROZEN_GRASS
                }
            }
        }
    }

    /// Whether the cavern field opens the cell at grid `(gx, gy, gz)`.
    pub fn is_cavern(&self, gx: i32, gy: i32, gz: i32) -> bool {
        self.cavern
            .normalized_3d(gx as f64, gy as f64, gz as f64)
            < CAVERN_THRESHOLD
    }

    /// Generates the full contents of the chunk at `index`.
    ///
    /// The returned chunk is marked generated and is dirty (it has no mesh yet).
    pub fn generate_chunk(&self, index: ChunkIndex) -> Chunk {
        let start = Instant::now();
        let mut chunk = Chunk::new(index);
        let origin_x = index.i * CHUNK_WIDTH;
        let origin_z = index.j * CHUNK_DEPTH;

        let mut profiles = Vec::with_capacity((CHUNK_WIDTH * CHUNK_DEPTH) as usize);
        for z in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                let profile = self.column_profile(origin_x + x, origin_z + z);
                self.fill_column(&mut chunk, x, z, origin_x + x, origin_z + z, &profile);
                profiles.push(profile);
            }
        }

        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            decorate(&mut chunk, &profiles, &mut rng);
        }

        chunk.mark_generated();
        debug!(
            "Generated chunk ({}, {}) in {:?}",
            index.i,
            index.j,
            start.elapsed()
        );
        chunk
    }

    fn fill_column(
        &self,
        chunk: &mut Chunk,
        x: i32,
        z: i32,
        gx: i32,
        gz: i32,
        profile: &ColumnProfile,
    ) {
        for y in 0..BEDROCK_LAYER_HEIGHT {
            chunk.set_voxel(x, y, z, Some(VoxelType::BEDROCK));
        }

        let subsurface = profile.biome.subsurface();
        for y in BEDROCK_LAYER_HEIGHT..profile.height {
            if self.is_cavern(gx, y, gz) {
                continue;
            }
            let fill = if y <= ROCK_TOP {
                VoxelType::STONE
            } else {
                subsurface
            };
            chunk.set_voxel(x, y, z, Some(fill));
        }

        chunk.set_voxel(x, profile.height, z, Some(profile.surface));
    }
}

/// Second pass: ore veins in stone, foliage on surface cells.
///
/// Scans y outer, x, z inner and draws every random value from `rng` in that order.
fn decorate(chunk: &mut Chunk, profiles: &[ColumnProfile], rng: &mut Rng) {
    for y in BEDROCK_LAYER_HEIGHT..CHUNK_HEIGHT {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_DEPTH {
                let profile = &profiles[(x + z * CHUNK_WIDTH) as usize];
                match chunk.voxel_at(x, y, z) {
                    Some(VoxelType::STONE) => {
                        if let Some(ore) = roll_ore(rng, y) {
                            let length = rng.usize(1..=MAX_VEIN_LENGTH);
                            grow_vein(chunk, rng, (x, y, z), ore, length);
                        }
                    }
                    Some(surface)
                        if y == profile.height
                            && surface == profile.surface
                            && chunk.voxel_at(x, y + 1, z).is_none() =>
                    {
                        grow_foliage(chunk, rng, x, y, z, profile.biome, surface);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn grow_foliage(
    chunk: &mut Chunk,
    rng: &mut Rng,
    x: i32,
    y: i32,
    z: i32,
    biome: Biome,
    surface: VoxelType,
) {
    let above = y + 1;
    match (biome, surface) {
        (Biome::NORMAL, VoxelType::GRASS) => {
            if rng.f64() < OAK_CHANCE {
                place_template(chunk, x, above, z, &features::oak_tree());
            } else if rng.f64() < TALL_GRASS_CHANCE {
                chunk.set_voxel(x, above, z, Some(VoxelType::TALL_GRASS));
            } else if rng.f64() < FLOWER_CHANCE {
                let flower = if rng.bool() {
                    VoxelType::RED_FLOWER
                } else {
                    VoxelType::YELLOW_FLOWER
                };
                chunk.set_voxel(x, above, z, Some(flower));
            } else if rng.f64() < MUSHROOM_CHANCE {
                let mushroom = if rng.bool() {
                    VoxelType::RED_MUSHROOM
                } else {
                    VoxelType::BROWN_MUSHROOM
                };
                chunk.set_voxel(x, above, z, Some(mushroom));
            }
        }
        (Biome::WINTER, VoxelType::FROZEN_GRASS) => {
            if rng.f64() < PINE_CHANCE {
                place_template(chunk, x, above, z, &features::pine_tree());
            } else if rng.f64() < SNOW_CHANCE {
                chunk.set_voxel(x, above, z, Some(VoxelType::SNOW));
            }
        }
        (Biome::OCEAN, VoxelType::SAND) => {
            if rng.f64() < REED_CHANCE {
                let height = rng.i32(1..=3);
                place_template(chunk, x, above, z, &features::stack(VoxelType::REED, height));
            }
        }
        (Biome::DESERT, VoxelType::SAND) => {
            if rng.f64() < CACTUS_CHANCE {
                let height = rng.i32(1..=3);
                place_template(chunk, x, above, z, &features::stack(VoxelType::CACTUS, height));
            } else if rng.f64() < DEAD_BUSH_CHANCE {
                chunk.set_voxel(x, above, z, Some(VoxelType::DEAD_BUSH));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voxels_of(chunk: &Chunk) -> Vec<(cgmath::Point3<i32>, VoxelType)> {
        chunk.occupied_voxels().collect()
    }

    #[test]
    fn column_profiles_are_reproducible() {
        let a = WorldGenerator::new(2024);
        let b = WorldGenerator::new(2024);
        for gx in (-90..90).step_by(7) {
            for gz in (-90..90).step_by(11) {
                assert_eq!(a.column_profile(gx, gz), b.column_profile(gx, gz));
            }
        }
    }

    #[test]
    fn region_relief_has_no_seam_at_chunk_borders() {
        let generator = WorldGenerator::new(31);
        for gz in (3..CHUNK_DEPTH * 4).step_by(5) {
            // Varies inside a chunk rather than holding one value per chunk.
            let inside = generator.region_factor(CHUNK_WIDTH + 1, gz);
            assert!((CHUNK_WIDTH + 2..2 * CHUNK_WIDTH)
                .any(|gx| generator.region_factor(gx, gz) != inside));

            for border in [-CHUNK_WIDTH, 0, CHUNK_WIDTH, 2 * CHUNK_WIDTH] {
                let step = generator.region_factor(border, gz)
                    - generator.region_factor(border - 1, gz);
                assert!(step.abs() < 0.1, "jump of {step} at x = {border}");
            }
        }
    }

    #[test]
    fn column_heights_stay_inside_the_chunk() {
        let generator = WorldGenerator::new(7);
        for gx in (-300..300).step_by(13) {
            for gz in (-300..300).step_by(17) {
                let profile = generator.column_profile(gx, gz);
                assert!(profile.height >= LAND_BASE - OCEAN_DEPTH, "{profile:?}");
                assert!(profile.height <= MAX_SURFACE, "{profile:?}");
                if profile.biome == Biome::OCEAN {
                    assert_eq!(profile.height, LAND_BASE - OCEAN_DEPTH);
                }
                if profile.biome == Biome::DESERT {
                    assert!(profile.height >= LAND_BASE + DESERT_FLOOR);
                }
            }
        }
    }

    #[test]
    fn surfaces_match_their_biome() {
        let generator = WorldGenerator::new(99);
        for gx in (-600..600).step_by(19) {
            for gz in (-600..600).step_by(23) {
                let profile = generator.column_profile(gx, gz);
                let allowed: &[VoxelType] = match profile.biome {
                    Biome::NORMAL => &[VoxelType::GRASS],
                    Biome::DESERT => &[VoxelType::SAND],
                    Biome::OCEAN => &[VoxelType::WATER, VoxelType::SAND],
                    Biome::WINTER => &[VoxelType::ICE, VoxelType::FROZEN_GRASS, VoxelType::SAND],
                };
                assert!(allowed.contains(&profile.surface), "{profile:?}");
            }
        }
    }

    #[test]
    fn generated_chunk_has_floor_and_surface() {
        let generator = WorldGenerator::new(2024);
        let index = ChunkIndex::new(-1, 2);
        let chunk = generator.generate_chunk(index);
        assert!(chunk.is_generated());
        assert!(chunk.is_dirty());
        assert!(!chunk.is_built());

        for z in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                assert_eq!(chunk.voxel_at(x, 0, z), Some(VoxelType::BEDROCK));
                let profile =
                    generator.column_profile(index.i * CHUNK_WIDTH + x, index.j * CHUNK_DEPTH + z);
                assert!(chunk.voxel_at(x, profile.height, z).is_some());
                for y in MAX_SURFACE + 8..CHUNK_HEIGHT {
                    assert_eq!(chunk.voxel_at(x, y, z), None);
                }
            }
        }
    }

    #[test]
    fn same_seed_and_order_gives_identical_chunks() {
        let order = [ChunkIndex::new(0, 0), ChunkIndex::new(1, 0), ChunkIndex::new(0, -1)];
        let a = WorldGenerator::new(31337);
        let b = WorldGenerator::new(31337);
        for index in order {
            assert_eq!(
                voxels_of(&a.generate_chunk(index)),
                voxels_of(&b.generate_chunk(index))
            );
        }
    }

    #[test]
    fn seeds_produce_different_terrain() {
        let a = WorldGenerator::new(1);
        let b = WorldGenerator::new(2);
        let differing = (0..40)
            .filter(|n| a.column_profile(n * 9, n * 5) != b.column_profile(n * 9, n * 5))
            .count();
        assert!(differing > 0);
    }
}
