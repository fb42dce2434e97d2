// Copyright 2023 drey7925
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! The default world: rolling stone terrain with lakes, caves, lava, ores and trees.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use strata_core::block::Block;
use strata_core::constants::world::{FLOOR_Y, WATER_HEIGHT};
use strata_core::coordinates::BlockCoordinate;
use tracing::{debug, info};

use crate::foliage::{grow_plant, leaves_radius, BlockAccess, Plant, TreeVoxel};
use crate::generated_chunk::GeneratedChunk;
use crate::mapgen::ChunkSource;
use crate::seeded::{Channel, SeededField};
use crate::settings::MapgenSettings;
use crate::tile_cache::CacheStats;

use self::caves::CaveField;
use self::hydrology::HydrologyField;
use self::lava::LavaField;
use self::ores::Decoration;
use self::rock::RockHeightField;
use self::trees::{TreeField, MAX_TREE_HEIGHT};

mod caves;
mod hydrology;
mod lava;
pub mod ores;
mod rock;
mod trees;

pub use self::caves::{CavePrimitive, TunnelHeading};

/// Topsoil this thick (dirt plus the grass layer) covers the rock on dry land.
const SOIL_DEPTH: i32 = 5;
const SAND_FRACTION: f32 = 0.5;
// Caves reach this far below the lowest rock surface in a footprint.
const TERRAIN_HINT_DEPTH: i32 = 48;

/// Which of the synthesis rules decided a voxel, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SynthesisRule {
    /// The bottom layer of the world.
    Bedrock,
    /// Carved out by a cave; holds tree parts, a decoration, or nothing.
    Cave,
    LavaLake,
    /// The air pocket over a lava lake.
    OverLava,
    /// Solid ground under standing water.
    LakeBed,
    /// Deep rock, or any rock under the water line.
    Ore,
    Subsoil,
    Surface,
    StandingWater,
    /// Above the terrain; holds tree parts or nothing.
    Open,
}

pub struct WorldGenerator {
    seed: i32,
    settings: MapgenSettings,
    noise: Arc<SeededField>,
    rock: Arc<RockHeightField>,
    hydrology: HydrologyField,
    lava: LavaField,
    caves: Arc<CaveField>,
    trees: TreeField,
}

impl WorldGenerator {
    /// Creates a generator for the given seed. The seed in `settings` is ignored.
    pub fn new(seed: i32, settings: &MapgenSettings) -> WorldGenerator {
        let buckets = settings.cache_buckets;
        let memo_buckets = if settings.memoize_samples { buckets } else { 0 };
        let noise = Arc::new(SeededField::new(seed, memo_buckets));
        let rock = Arc::new(RockHeightField::new(noise.clone(), buckets));
        let caves = Arc::new(CaveField::new(
            noise.clone(),
            rock.clone(),
            settings.cave_probability,
            buckets,
        ));
        WorldGenerator {
            seed,
            settings: settings.clone(),
            hydrology: HydrologyField::new(rock.clone()),
            lava: LavaField::new(
                noise.clone(),
                rock.clone(),
                settings.lava_lake_probability,
                buckets,
            ),
            trees: TreeField::new(
                noise.clone(),
                rock.clone(),
                caves.clone(),
                settings.tree_probability,
                buckets,
            ),
            noise,
            rock,
            caves,
        }
    }

    /// Uses the seed from `settings` if there is one, otherwise picks a random seed as in
    /// [WorldGenerator::with_random_seed].
    pub fn from_settings(settings: &MapgenSettings) -> WorldGenerator {
        match settings.seed {
            Some(seed) => {
                info!("Using configured seed {seed}");
                WorldGenerator::new(seed, settings)
            }
            None => WorldGenerator::with_random_seed(settings),
        }
    }

    /// Draws random seeds until one gives a reasonable spawn point at the origin: dry land,
    /// not inside a tree, not inside a cave.
    pub fn with_random_seed(settings: &MapgenSettings) -> WorldGenerator {
        let mut rng = rand::thread_rng();
        let mut attempts = 0;
        loop {
            attempts += 1;
            let generator = WorldGenerator::new(rng.gen(), settings);
            if generator.has_viable_spawn() {
                info!(
                    "Picked seed {} after {attempts} attempt(s); spawn at {:?}",
                    generator.seed,
                    generator.spawn_point()
                );
                return generator;
            }
            debug!("Rejected seed {}", generator.seed);
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn settings(&self) -> &MapgenSettings {
        &self.settings
    }

    /// The first open block above the rock surface at the origin.
    pub fn spawn_point(&self) -> BlockCoordinate {
        BlockCoordinate::new(0, self.rock_height(0, 0) + 1, 0)
    }

    pub fn has_viable_spawn(&self) -> bool {
        let ground = self.rock_height(0, 0);
        ground >= WATER_HEIGHT
            && !self.has_tree(0, 0)
            && self.tree_voxel_at(self.spawn_point()) == TreeVoxel::Empty
            && !self.is_in_cave(BlockCoordinate::new(0, ground, 0))
    }

    pub fn rock_height(&self, x: i32, z: i32) -> i32 {
        self.rock.height(x, z)
    }

    pub fn is_submerged(&self, coord: BlockCoordinate) -> bool {
        self.hydrology.is_submerged(coord.x, coord.y, coord.z)
    }

    pub fn is_lava(&self, coord: BlockCoordinate) -> bool {
        self.lava.is_lava(coord.x, coord.y, coord.z)
    }

    pub fn is_over_lava(&self, coord: BlockCoordinate) -> bool {
        self.lava.is_over_lava(coord.x, coord.y, coord.z)
    }

    pub fn is_in_cave(&self, coord: BlockCoordinate) -> bool {
        self.caves.is_in_cave(coord.x, coord.y, coord.z)
    }

    pub fn cave_primitive_at(&self, x: i32, z: i32) -> CavePrimitive {
        self.caves.primitive_at(x, z)
    }

    /// Whether a tree is rooted in column (x, z).
    pub fn has_tree(&self, x: i32, z: i32) -> bool {
        self.trees.tree_height_at(x, z).is_some()
    }

    /// The trunk height of the tree rooted in column (x, z), if any.
    pub fn tree_height_at(&self, x: i32, z: i32) -> Option<i32> {
        self.trees.tree_height_at(x, z)
    }

    /// What the generated trees (all of them, combined) put at this voxel.
    pub fn tree_voxel_at(&self, coord: BlockCoordinate) -> TreeVoxel {
        self.trees.voxel_at(coord.x, coord.y, coord.z)
    }

    /// Decides the block at `coord`, and which rule decided it.
    pub fn classify(&self, coord: BlockCoordinate) -> (SynthesisRule, Block) {
        self.classify_in_column(coord, self.rock.height(coord.x, coord.z))
    }

    fn classify_in_column(&self, coord: BlockCoordinate, rock: i32) -> (SynthesisRule, Block) {
        let BlockCoordinate { x, y, z } = coord;
        if y == FLOOR_Y {
            return (SynthesisRule::Bedrock, Block::Bedrock);
        }
        if self.caves.is_in_cave(x, y, z) {
            let block = match self.trees.voxel_at(x, y, z).block() {
                Some(block) => block,
                None => self.cave_decoration(coord),
            };
            return (SynthesisRule::Cave, block);
        }
        if self.lava.is_lava(x, y, z) {
            return (SynthesisRule::LavaLake, Block::Lava);
        }
        if self.lava.is_over_lava(x, y, z) {
            return (SynthesisRule::OverLava, Block::Air);
        }
        if y <= rock {
            if self.hydrology.is_submerged(x, y, z) {
                return (SynthesisRule::LakeBed, self.lake_bed(coord));
            }
            if y < rock - SOIL_DEPTH || rock < WATER_HEIGHT {
                return (SynthesisRule::Ore, ores::ore_at(&self.noise, x, y, z));
            }
            if y < rock {
                return (SynthesisRule::Subsoil, Block::Dirt);
            }
            return (SynthesisRule::Surface, Block::Grass);
        }
        if y <= WATER_HEIGHT {
            return (SynthesisRule::StandingWater, Block::Water);
        }
        let block = self.trees.voxel_at(x, y, z).block().unwrap_or(Block::Air);
        (SynthesisRule::Open, block)
    }

    fn lake_bed(&self, coord: BlockCoordinate) -> Block {
        let below = coord.below();
        if self.caves.is_in_cave(below.x, below.y, below.z) {
            // Sand over a cave would be left hanging.
            Block::Stone
        } else if self.noise.sample(coord.x, coord.y, coord.z, Channel::LAKE_BED_TYPE)
            < SAND_FRACTION
        {
            Block::Sand
        } else {
            Block::Gravel
        }
    }

    /// Whether the voxel below `coord` is open cave: carved out and not holding tree parts.
    fn is_cave_void_below(&self, coord: BlockCoordinate) -> bool {
        let below = coord.below();
        below.y > FLOOR_Y
            && self.caves.is_in_cave(below.x, below.y, below.z)
            && self.trees.voxel_at(below.x, below.y, below.z) == TreeVoxel::Empty
    }

    fn cave_decoration(&self, coord: BlockCoordinate) -> Block {
        let sample = self
            .noise
            .sample(coord.x, coord.y, coord.z, Channel::CAVE_DECORATION);
        match ores::decoration_for_sample(sample, self.settings.decoration_probability, || {
            !self.is_cave_void_below(coord)
        }) {
            Decoration::None => Block::Air,
            Decoration::Torch => Block::Torch,
            Decoration::Chest => Block::Chest,
        }
    }

    /// Generates the cube of blocks with the given lowest corner and edge length.
    ///
    /// Panics if `size` is zero.
    pub fn generate_chunk(&self, origin: BlockCoordinate, size: u32) -> GeneratedChunk {
        let start = Instant::now();
        let mut chunk = GeneratedChunk::new(origin, size);
        let edge = size as i32;
        for dx in 0..edge {
            for dz in 0..edge {
                let (x, z) = (origin.x + dx, origin.z + dz);
                let rock = self.rock.height(x, z);
                for dy in 0..edge {
                    let coord = BlockCoordinate::new(x, origin.y + dy, z);
                    let (_, block) = self.classify_in_column(coord, rock);
                    chunk.set_block(coord, block);
                    if block == Block::Chest {
                        chunk.set_chest(coord, ores::chest_loot(&self.noise, coord));
                    }
                }
            }
        }
        debug!(
            "Generated chunk at {origin:?} (size {size}) in {:?}",
            start.elapsed()
        );
        chunk
    }

    /// Grows a tree with its trunk base at `origin` into `world`, the same shape that generation
    /// would produce. Without an explicit height, the tree gets the height a naturally generated
    /// tree in that column would have. Returns the number of blocks written.
    ///
    /// Panics if `height` is not positive.
    pub fn grow_tree(
        &self,
        world: &mut impl BlockAccess,
        origin: BlockCoordinate,
        height: Option<i32>,
    ) -> usize {
        let height = height.unwrap_or_else(|| self.trees.natural_height(origin.x, origin.z));
        assert!(height > 0, "tree height must be positive, got {height}");
        grow_plant(world, origin, &Plant::Tree { height })
    }

    /// Range of block Y values where the surface (and what sits on it) is likely to be found in
    /// the given footprint, sampled at its corners and center.
    pub fn terrain_range_hint(&self, x: i32, z: i32, size: u32) -> RangeInclusive<i32> {
        let far = size.saturating_sub(1).min(i32::MAX as u32) as i32;
        let half = far / 2;
        let heights = [
            (0, 0),
            (far, 0),
            (0, far),
            (far, far),
            (half, half),
        ]
        .map(|(dx, dz)| {
            self.rock
                .height(x.saturating_add(dx), z.saturating_add(dz))
        });
        let low = heights.iter().copied().min().unwrap_or(WATER_HEIGHT);
        let high = heights.iter().copied().max().unwrap_or(WATER_HEIGHT);
        let canopy = MAX_TREE_HEIGHT + 2 * leaves_radius(MAX_TREE_HEIGHT) + 1;
        (low - TERRAIN_HINT_DEPTH).max(FLOOR_Y)..=(high + canopy).max(WATER_HEIGHT)
    }

    pub fn dump_debug(&self, pos: BlockCoordinate) {
        let BlockCoordinate { x, y, z } = pos;
        let (rule, block) = self.classify(pos);
        info!("Mapgen debug at {pos:?} (seed {})", self.seed);
        info!(
            "rock height {}, submerged {}, lava {}, over lava {}",
            self.rock.height(x, z),
            self.hydrology.is_submerged(x, y, z),
            self.lava.is_lava(x, y, z),
            self.lava.is_over_lava(x, y, z)
        );
        info!(
            "in cave {}, cave primitive here {:?}, lava lake here {:?}",
            self.caves.is_in_cave(x, y, z),
            self.cave_primitive_at(x, z),
            self.lava.lake_at(x, z)
        );
        info!(
            "tree rooted here {:?}, tree voxel {:?}",
            self.trees.tree_height_at(x, z),
            self.trees.voxel_at(x, y, z)
        );
        info!(
            "ore draw {} -> {block:?} via {rule:?}",
            ores::ore_draw(&self.noise, x, y, z)
        );
    }

    /// Hit/miss counters for every cache in this generator.
    pub fn cache_stats(&self) -> Vec<CacheStats> {
        let mut stats = vec![self.rock.cache_stats(), self.lava.cache_stats()];
        stats.extend(self.caves.cache_stats());
        stats.extend(self.trees.cache_stats());
        stats.extend(self.noise.memo_stats());
        stats
    }
}

impl ChunkSource for WorldGenerator {
    fn generate_chunk(&self, origin: BlockCoordinate, size: u32) -> GeneratedChunk {
        WorldGenerator::generate_chunk(self, origin, size)
    }

    fn rock_height(&self, x: i32, z: i32) -> i32 {
        WorldGenerator::rock_height(self, x, z)
    }

    fn terrain_range_hint(&self, x: i32, z: i32, size: u32) -> Option<RangeInclusive<i32>> {
        Some(WorldGenerator::terrain_range_hint(self, x, z, size))
    }

    fn dump_debug(&self, pos: BlockCoordinate) {
        WorldGenerator::dump_debug(self, pos)
    }
}
