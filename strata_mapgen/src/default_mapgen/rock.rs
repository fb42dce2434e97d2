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

use strata_core::constants::world::{DEPTH, HEIGHT};
use strata_core::coordinates::TileCoordinate;

use crate::seeded::{Channel, SeededField};
use crate::tile_cache::{CacheStats, TileCache};

pub(crate) const ROCK_TILE: i32 = 4;

const ROUGHNESS_INPUT_SCALE: f64 = 1.0 / 256.0;
const ROUGHNESS_BASE: f32 = 0.35;
const ROUGHNESS_RANGE: f32 = 0.3;
const BASE_FREQUENCY: f64 = 1.0 / 128.0;
// Octaves whose weight falls below this contribute less than a block of height.
const MIN_OCTAVE_AMPLITUDE: f32 = 1.0 / 64.0;
const MAX_OCTAVES: i32 = 16;
const VERTICAL_SQUASH: f32 = 4.0;

type RockTile = [[i32; ROCK_TILE as usize]; ROCK_TILE as usize];

/// Height of the solid rock surface for every (x, z) column.
pub(crate) struct RockHeightField {
    noise: Arc<SeededField>,
    cache: TileCache<TileCoordinate, RockTile>,
}
impl RockHeightField {
    pub(crate) fn new(noise: Arc<SeededField>, cache_buckets: usize) -> RockHeightField {
        RockHeightField {
            noise,
            cache: TileCache::new("rock_height", cache_buckets),
        }
    }

    /// The rock height at (x, z), always within [-DEPTH, HEIGHT - 1].
    #[inline]
    pub(crate) fn height(&self, x: i32, z: i32) -> i32 {
        let tile = self
            .cache
            .get(TileCoordinate::column(x, z, ROCK_TILE), |t| self.fill(t));
        tile[x.rem_euclid(ROCK_TILE) as usize][z.rem_euclid(ROCK_TILE) as usize]
    }

    fn fill(&self, tile: TileCoordinate) -> RockTile {
        let origin = tile.origin(ROCK_TILE);
        std::array::from_fn(|dx| {
            std::array::from_fn(|dz| {
                self.compute(
                    origin.x.wrapping_add(dx as i32),
                    origin.z.wrapping_add(dz as i32),
                )
            })
        })
    }

    /// Fractal sum of interpolated value noise. The per-octave falloff (the roughness) itself
    /// varies slowly across the world, giving a mix of flat plains and craggy hills.
    pub(crate) fn compute(&self, x: i32, z: i32) -> i32 {
        let (xf, zf) = (x as f64, z as f64);
        let roughness = ROUGHNESS_BASE
            + ROUGHNESS_RANGE
                * self.noise.interpolated(
                    xf * ROUGHNESS_INPUT_SCALE,
                    zf * ROUGHNESS_INPUT_SCALE,
                    -1,
                    Channel::ROCK_HEIGHT,
                );

        let mut frequency = BASE_FREQUENCY;
        let mut amplitude = 1.0f32;
        let mut sum = 0.0f32;
        let mut total_weight = 0.0f32;
        for octave in 0..MAX_OCTAVES {
            if amplitude < MIN_OCTAVE_AMPLITUDE {
                break;
            }
            sum += amplitude
                * self.noise.interpolated(
                    xf * frequency,
                    zf * frequency,
                    octave,
                    Channel::ROCK_HEIGHT,
                );
            total_weight += amplitude;
            frequency = (frequency * 2.0).min(1.0);
            amplitude *= roughness;
        }
        let normalized = sum / total_weight;

        let range = (HEIGHT + DEPTH) as f32;
        let height = ((normalized * range - DEPTH as f32) / VERTICAL_SQUASH).round() as i32;
        height.clamp(-DEPTH, HEIGHT - 1)
    }

    pub(crate) fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[cfg(test)]
    pub(crate) fn clear_cache(&self) {
        self.cache.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: i32) -> RockHeightField {
        RockHeightField::new(Arc::new(SeededField::new(seed, 0)), 61)
    }

    #[test]
    fn test_heights_within_world() {
        let rock = field(17);
        for x in (-2000..2000).step_by(37) {
            for z in (-2000..2000).step_by(41) {
                let h = rock.height(x, z);
                assert!((-DEPTH..HEIGHT).contains(&h), "{h} at {x}, {z}");
            }
        }
    }

    #[test]
    fn test_tile_order_invariance() {
        let rock = field(99);
        let forward: Vec<i32> = (-10..10)
            .flat_map(|x| (-10..10).map(move |z| (x, z)))
            .map(|(x, z)| rock.height(x, z))
            .collect();
        rock.clear_cache();
        let mut reverse: Vec<i32> = (-10..10)
            .flat_map(|x| (-10..10).map(move |z| (x, z)))
            .rev()
            .map(|(x, z)| rock.height(x, z))
            .collect();
        reverse.reverse();
        assert_eq!(forward, reverse);

        // A cache with a single bucket evicts on nearly every lookup.
        let thrashing = RockHeightField::new(Arc::new(SeededField::new(99, 0)), 1);
        for (i, (x, z)) in (-10..10)
            .flat_map(|x| (-10..10).map(move |z| (x, z)))
            .enumerate()
        {
            assert_eq!(thrashing.height(x, z), forward[i]);
            assert_eq!(thrashing.compute(x, z), forward[i]);
        }
    }

    #[test]
    fn test_terrain_is_continuous() {
        let rock = field(4);
        let mut big_steps = 0;
        for x in 0..400 {
            if (rock.height(x, 0) - rock.height(x + 1, 0)).abs() > 4 {
                big_steps += 1;
            }
        }
        assert!(big_steps < 20, "{big_steps} cliffs in 400 steps");
    }
}
