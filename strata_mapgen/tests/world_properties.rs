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

use std::sync::Arc;

use strata_core::block::{Block, OreKind};
use strata_core::constants::world::{DEPTH, FLOOR_Y, WATER_HEIGHT};
use strata_core::coordinates::BlockCoordinate;
use strata_mapgen::default_mapgen::ores::ore_for_draw;
use strata_mapgen::default_mapgen::CavePrimitive;
use strata_mapgen::foliage::{tree_shape, BlockAccess, TreeVoxel};
use strata_mapgen::settings::MapgenSettings;
use strata_mapgen::{ChunkSource, GeneratedChunk, SynthesisRule, WorldGenerator};

#[ctor::ctor]
fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn generator(seed: i32) -> WorldGenerator {
    WorldGenerator::new(seed, &MapgenSettings::default())
}

#[test]
fn test_chunks_independent_of_generation_order() {
    let a = generator(31337);
    let b = generator(31337);
    let first = BlockCoordinate::new(0, -16, 0);
    let second = BlockCoordinate::new(16, -16, -16);

    let a1 = a.generate_chunk(first, 16);
    let a2 = a.generate_chunk(second, 16);
    let b2 = b.generate_chunk(second, 16);
    let b1 = b.generate_chunk(first, 16);
    assert_eq!(a1, b1);
    assert_eq!(a2, b2);

    // A generator whose caches hold a single tile each recomputes nearly everything.
    let thrashing = WorldGenerator::new(
        31337,
        &MapgenSettings {
            cache_buckets: 1,
            ..Default::default()
        },
    );
    assert_eq!(thrashing.generate_chunk(second, 16), a2);
    assert_eq!(thrashing.generate_chunk(first, 16), a1);
}

#[test]
fn test_sample_memo_is_invisible() {
    let memoized = generator(8);
    let plain = WorldGenerator::new(
        8,
        &MapgenSettings {
            memoize_samples: false,
            ..Default::default()
        },
    );
    let origin = BlockCoordinate::new(-16, -8, 32);
    assert_eq!(memoized.generate_chunk(origin, 16), plain.generate_chunk(origin, 16));
}

#[test]
fn test_overlapping_chunks_agree() {
    let gen = generator(-400);
    let big = gen.generate_chunk(BlockCoordinate::new(-16, -16, -16), 32);
    let fresh = generator(-400);
    for origin in [
        BlockCoordinate::new(-16, -16, -16),
        BlockCoordinate::new(-3, 2, 7),
        BlockCoordinate::new(8, 8, 8),
    ] {
        let small = fresh.generate_chunk(origin, 8);
        for (coord, block) in small.iter() {
            assert_eq!(big.get_block(coord), block, "at {coord:?}");
        }
    }
}

#[test]
fn test_seeds_give_different_terrain() {
    let a = generator(1);
    let b = generator(2);
    let mut same = 0;
    let mut total = 0;
    for i in 0..200 {
        let (x, z) = (i * 53 - 5000, i * 97 - 7000);
        total += 1;
        if a.rock_height(x, z) == b.rock_height(x, z) {
            same += 1;
        }
    }
    assert!(same < total * 3 / 10, "{same} of {total} columns matched");
}

#[test]
fn test_tile_boundaries_independent_of_query_order() {
    let forward = generator(5150);
    let backward = generator(5150);
    // Columns straddling 4- and 16-wide tile edges.
    let columns: Vec<(i32, i32)> = (-18..18)
        .flat_map(|x| [(x, -1), (x, 0), (x, 15), (x, 16)])
        .collect();
    let heights: Vec<i32> = columns.iter().map(|&(x, z)| forward.rock_height(x, z)).collect();
    for (i, &(x, z)) in columns.iter().enumerate().rev() {
        assert_eq!(backward.rock_height(x, z), heights[i]);
    }
    for (i, &(x, z)) in columns.iter().enumerate() {
        assert_eq!(forward.rock_height(x, z), heights[i]);
    }
}

#[test]
fn test_bedrock_floor() {
    let gen = generator(99);
    for (x, z) in [(0, 0), (-32, 48), (1024, -512)] {
        let chunk = gen.generate_chunk(BlockCoordinate::new(x, FLOOR_Y, z), 16);
        for (coord, block) in chunk.iter() {
            if coord.y == FLOOR_Y {
                assert_eq!(block, Block::Bedrock, "at {coord:?}");
            } else {
                assert_ne!(block, Block::Bedrock, "at {coord:?}");
            }
        }
    }
}

#[test]
fn test_every_voxel_gets_exactly_one_rule() {
    let gen = generator(17);
    let chunk = gen.generate_chunk(BlockCoordinate::new(-8, -8, -8), 16);
    assert_eq!(chunk.histogram().values().sum::<u64>(), 16 * 16 * 16);
    for (coord, block) in chunk.iter() {
        let (rule, classified) = gen.classify(coord);
        assert_eq!(classified, block);
        assert_eq!(gen.classify(coord), (rule, classified));
        let rock = gen.rock_height(coord.x, coord.z);
        match rule {
            SynthesisRule::StandingWater | SynthesisRule::Open => assert!(coord.y > rock),
            SynthesisRule::LakeBed
            | SynthesisRule::Ore
            | SynthesisRule::Subsoil
            | SynthesisRule::Surface => assert!(coord.y <= rock),
            _ => {}
        }
    }
}

#[test]
fn test_cave_occupancy_symmetric_across_fresh_generators() {
    let settings = MapgenSettings {
        cave_probability: 0.08,
        ..Default::default()
    };
    let warm = WorldGenerator::new(2718, &settings);
    let cold = WorldGenerator::new(2718, &settings);
    let mut points = Vec::new();
    for x in (-40..40).step_by(3) {
        for z in (-40..40).step_by(5) {
            for y in (-60..10).step_by(2) {
                points.push(BlockCoordinate::new(x, y, z));
            }
        }
    }
    let expected: Vec<bool> = points.iter().map(|&p| warm.is_in_cave(p)).collect();
    assert!(expected.iter().any(|&c| c));
    for (i, &p) in points.iter().enumerate().rev() {
        assert_eq!(cold.is_in_cave(p), expected[i], "at {p:?}");
    }
}

#[test]
fn test_lava_lakes_caves_and_torches() {
    let gen = WorldGenerator::new(
        123,
        &MapgenSettings {
            lava_lake_probability: 0.05,
            cave_probability: 0.05,
            decoration_probability: 0.5,
            ..Default::default()
        },
    );
    let (mut lava, mut over_lava, mut cave_over_lava, mut torches) = (0, 0, 0, 0);
    for cx in -1..2 {
        for cz in -1..2 {
            for cy in -4..0 {
                let origin = BlockCoordinate::new(cx * 16, cy * 16, cz * 16);
                let chunk = gen.generate_chunk(origin, 16);
                for (coord, block) in chunk.iter() {
                    let (rule, _) = gen.classify(coord);
                    match rule {
                        SynthesisRule::LavaLake => {
                            assert_eq!(block, Block::Lava);
                            lava += 1;
                        }
                        SynthesisRule::OverLava => {
                            assert_eq!(block, Block::Air);
                            assert!(gen.is_over_lava(coord));
                            over_lava += 1;
                        }
                        _ => assert_ne!(block, Block::Lava, "stray lava at {coord:?}"),
                    }
                    // Caves carve through lava lakes.
                    if gen.is_lava(coord) && gen.is_in_cave(coord) {
                        assert_eq!(rule, SynthesisRule::Cave);
                        cave_over_lava += 1;
                    }
                    if block == Block::Torch {
                        torches += 1;
                        let below = coord.below();
                        // Bedrock counts as a floor even where a cave reaches it.
                        let open_below = below.y > FLOOR_Y
                            && gen.is_in_cave(below)
                            && gen.tree_voxel_at(below) == TreeVoxel::Empty;
                        assert!(!open_below, "torch over open cave at {coord:?}");
                    }
                }
            }
        }
    }
    assert!(lava > 0);
    assert!(over_lava > 0);
    assert!(cave_over_lava > 0);
    assert!(torches > 0);
}

#[test]
fn test_cave_primitives_carve_their_centers() {
    let gen = WorldGenerator::new(
        77,
        &MapgenSettings {
            cave_probability: 0.05,
            ..Default::default()
        },
    );
    let (mut spheres, mut tunnels) = (0, 0);
    for x in -40..40 {
        for z in -40..40 {
            let center_y = match gen.cave_primitive_at(x, z) {
                CavePrimitive::Empty => continue,
                CavePrimitive::Sphere { center_y, .. } => {
                    spheres += 1;
                    center_y
                }
                CavePrimitive::Tunnel { center_y, .. } => {
                    tunnels += 1;
                    center_y
                }
            };
            assert!(gen.is_in_cave(BlockCoordinate::new(x, center_y, z)));
        }
    }
    assert!(spheres > 0 && tunnels > 0);
}

#[test]
fn test_ore_depth_gating() {
    let diamond_draw = 87;
    assert_eq!(ore_for_draw(diamond_draw, 20 - DEPTH), Block::Ore(OreKind::Diamond));
    assert_eq!(ore_for_draw(diamond_draw, 40 - DEPTH), Block::Stone);
}

#[test]
fn test_deep_ores_only_below_gates() {
    let gen = generator(64);
    for y in (FLOOR_Y + 1)..0 {
        for x in 0..40 {
            let coord = BlockCoordinate::new(x, y, -x);
            let (rule, block) = gen.classify(coord);
            if rule != SynthesisRule::Ore {
                continue;
            }
            match block {
                Block::Ore(OreKind::Diamond) => assert!(y < -36),
                Block::Ore(OreKind::Emerald) => assert!(y < -40),
                Block::Ore(OreKind::Gold) => assert!(y < -32),
                Block::Ore(OreKind::Iron) => assert!(y < 0),
                _ => {}
            }
        }
    }
}

#[test]
fn test_canopy_shape() {
    assert_eq!(tree_shape(0, 0, 0, 7), TreeVoxel::Wood);
    assert_eq!(tree_shape(0, 7 + 5, 0, 7), TreeVoxel::Leaves);
    assert_eq!(tree_shape(100, 100, 100, 7), TreeVoxel::Empty);
}

#[test]
fn test_generated_trees_match_shape_library() {
    let gen = generator(4242);
    let mut trees = 0;
    for x in -40..40 {
        for z in -40..40 {
            let Some(height) = gen.tree_height_at(x, z) else {
                continue;
            };
            trees += 1;
            let base = BlockCoordinate::new(x, gen.rock_height(x, z) + 1, z);
            assert!(base.y > WATER_HEIGHT);
            assert_eq!(gen.tree_voxel_at(base), TreeVoxel::Wood);
            let (rule, block) = gen.classify(base);
            if matches!(rule, SynthesisRule::Open | SynthesisRule::Cave) {
                assert_eq!(block, Block::Wood);
            }

            // Growing the same tree into an empty chunk puts wood wherever generation did.
            let mut chunk = GeneratedChunk::new(BlockCoordinate::new(x - 8, base.y, z - 8), 24);
            gen.grow_tree(&mut chunk, base, Some(height));
            for (coord, block) in chunk.iter() {
                if block == Block::Wood {
                    assert_eq!(gen.tree_voxel_at(coord), TreeVoxel::Wood, "at {coord:?}");
                }
            }
        }
    }
    assert!(trees > 0);
}

#[test]
fn test_chests_are_filled() {
    let settings = MapgenSettings {
        cave_probability: 0.3,
        decoration_probability: 1.0,
        ..Default::default()
    };
    let gen = WorldGenerator::new(606, &settings);
    let chunk = gen.generate_chunk(BlockCoordinate::new(0, -40, 0), 24);
    let mut chests = 0;
    for (coord, block) in chunk.iter() {
        if block == Block::Chest {
            chests += 1;
            assert!(chunk.chest_at(coord).is_some(), "empty chest at {coord:?}");
        }
    }
    assert!(chests > 0);
    assert_eq!(chunk.chests().count(), chests);
}

#[test]
fn test_random_seed_has_usable_spawn() {
    let gen = WorldGenerator::with_random_seed(&MapgenSettings::default());
    let spawn = gen.spawn_point();
    assert!(spawn.y - 1 >= WATER_HEIGHT);
    assert!(!gen.has_tree(0, 0));
    assert!(!gen.is_in_cave(spawn.below()));
    assert_eq!(gen.tree_voxel_at(spawn), TreeVoxel::Empty);
}

#[test]
fn test_shared_generator_across_threads() {
    let shared: Arc<dyn ChunkSource> = Arc::new(generator(1999));
    let origins: Vec<BlockCoordinate> = (-2..2)
        .flat_map(|x| (-1..1).map(move |y| BlockCoordinate::new(x * 16, y * 16, 8)))
        .collect();

    let reference = generator(1999);
    let expected: Vec<GeneratedChunk> = origins
        .iter()
        .map(|&o| reference.generate_chunk(o, 16))
        .collect();

    std::thread::scope(|s| {
        for t in 0..4 {
            let shared = shared.clone();
            let origins = &origins;
            let expected = &expected;
            s.spawn(move || {
                for round in 0..origins.len() {
                    let i = (round * (t * 2 + 1) + t) % origins.len();
                    assert_eq!(shared.generate_chunk(origins[i], 16), expected[i]);
                }
            });
        }
    });
}

#[test]
fn test_block_access_sees_generated_blocks() {
    let gen = generator(12);
    let chunk = gen.generate_chunk(BlockCoordinate::new(0, -4, 0), 8);
    for (coord, block) in chunk.iter() {
        assert_eq!(BlockAccess::get_block(&chunk, coord), Some(block));
    }
    assert_eq!(BlockAccess::get_block(&chunk, BlockCoordinate::new(0, 4, 0)), None);
}
