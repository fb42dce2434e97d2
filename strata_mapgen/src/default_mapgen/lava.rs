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

use strata_core::constants::world::DEPTH;
use strata_core::coordinates::TileCoordinate;

use super::rock::RockHeightField;
use crate::seeded::{Channel, SeededField};
use crate::tile_cache::{CacheStats, TileCache};

pub(crate) const LAVA_TILE: i32 = 16;
pub(crate) const MIN_LAKE_SIZE: i32 = 3;
pub(crate) const MAX_LAKE_SIZE: i32 = 8;
/// Lava lakes never rise above this level.
pub(crate) const LAVA_MAX_Y: i32 = 0;
pub(crate) const LAVA_MIN_Y: i32 = -DEPTH + 4;
// Lakes must stay at least this far below the rock surface above them.
const LAKE_ROCK_CLEARANCE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct LavaLake {
    /// Zero means no lake is centered on this column.
    pub(crate) radius: i32,
    pub(crate) surface_y: i32,
}
impl LavaLake {
    const NONE: LavaLake = LavaLake {
        radius: 0,
        surface_y: 0,
    };

    fn is_present(&self) -> bool {
        self.radius > 0
    }

    /// Lava fills the lower half of a squashed ellipsoid. `dx`, `dy`, `dz` are offsets from the
    /// lake's center column at its surface.
    fn holds_lava(&self, dx: i32, dy: i32, dz: i32) -> bool {
        dy <= 0 && dx * dx + 9 * dy * dy + dz * dz < self.radius * self.radius
    }

    /// The air pocket directly above the surface, a third of the radius tall.
    fn holds_air(&self, dx: i32, dy: i32, dz: i32) -> bool {
        dy > 0 && dy <= self.radius / 3 && dx * dx + dz * dz < self.radius * self.radius
    }
}

struct LakeTile {
    grid: [[LavaLake; LAVA_TILE as usize]; LAVA_TILE as usize],
    /// Center (x, z) of every lake present in `grid`.
    lakes: Vec<(i32, i32, LavaLake)>,
}
type LavaTile = Arc<LakeTile>;

/// Sparse underground lava lakes, each centered on a single column.
pub(crate) struct LavaField {
    noise: Arc<SeededField>,
    rock: Arc<RockHeightField>,
    lake_probability: f32,
    cache: TileCache<TileCoordinate, LavaTile>,
}
impl LavaField {
    pub(crate) fn new(
        noise: Arc<SeededField>,
        rock: Arc<RockHeightField>,
        lake_probability: f32,
        cache_buckets: usize,
    ) -> LavaField {
        LavaField {
            noise,
            rock,
            lake_probability,
            cache: TileCache::new("lava_lakes", cache_buckets),
        }
    }

    pub(crate) fn is_lava(&self, x: i32, y: i32, z: i32) -> bool {
        if !(LAVA_MIN_Y - MAX_LAKE_SIZE / 3..=LAVA_MAX_Y).contains(&y) {
            return false;
        }
        self.any_lake_near(x, z, |dx, dz, lake| {
            lake.holds_lava(dx, y - lake.surface_y, dz)
        })
    }

    pub(crate) fn is_over_lava(&self, x: i32, y: i32, z: i32) -> bool {
        if !(LAVA_MIN_Y..=LAVA_MAX_Y + MAX_LAKE_SIZE / 3).contains(&y) {
            return false;
        }
        self.any_lake_near(x, z, |dx, dz, lake| {
            lake.holds_air(dx, y - lake.surface_y, dz)
        })
    }

    /// The lake centered on column (x, z), if there is one.
    pub(crate) fn lake_at(&self, x: i32, z: i32) -> Option<LavaLake> {
        let tile = self.tile(TileCoordinate::column(x, z, LAVA_TILE));
        let lake = tile.grid[x.rem_euclid(LAVA_TILE) as usize][z.rem_euclid(LAVA_TILE) as usize];
        lake.is_present().then_some(lake)
    }

    fn any_lake_near(
        &self,
        x: i32,
        z: i32,
        mut test: impl FnMut(i32, i32, &LavaLake) -> bool,
    ) -> bool {
        let low = TileCoordinate::column(
            x.saturating_sub(MAX_LAKE_SIZE),
            z.saturating_sub(MAX_LAKE_SIZE),
            LAVA_TILE,
        );
        let high = TileCoordinate::column(
            x.saturating_add(MAX_LAKE_SIZE),
            z.saturating_add(MAX_LAKE_SIZE),
            LAVA_TILE,
        );
        for tx in low.x..=high.x {
            for tz in low.z..=high.z {
                let tile = self.tile(TileCoordinate::new(tx, 0, tz));
                for (cx, cz, lake) in tile.lakes.iter() {
                    let dx = x.wrapping_sub(*cx);
                    let dz = z.wrapping_sub(*cz);
                    if dx.abs() > MAX_LAKE_SIZE || dz.abs() > MAX_LAKE_SIZE {
                        continue;
                    }
                    if test(dx, dz, lake) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn tile(&self, coord: TileCoordinate) -> LavaTile {
        self.cache.get(coord, |t| {
            let origin = t.origin(LAVA_TILE);
            let grid: [[LavaLake; LAVA_TILE as usize]; LAVA_TILE as usize] =
                std::array::from_fn(|i| {
                    std::array::from_fn(|j| {
                        self.compute(
                            origin.x.wrapping_add(i as i32),
                            origin.z.wrapping_add(j as i32),
                        )
                    })
                });
            let mut lakes = Vec::new();
            for (i, row) in grid.iter().enumerate() {
                for (j, lake) in row.iter().enumerate() {
                    if lake.is_present() {
                        lakes.push((
                            origin.x.wrapping_add(i as i32),
                            origin.z.wrapping_add(j as i32),
                            *lake,
                        ));
                    }
                }
            }
            Arc::new(LakeTile { grid, lakes })
        })
    }

    fn compute(&self, x: i32, z: i32) -> LavaLake {
        if self.noise.sample(x, 0, z, Channel::LAVA) >= self.lake_probability {
            return LavaLake::NONE;
        }
        let size_range = (MAX_LAKE_SIZE - MIN_LAKE_SIZE + 1) as f32;
        let radius = (MIN_LAKE_SIZE
            + (self.noise.sample(x, 1, z, Channel::LAVA) * size_range).floor() as i32)
            .min(MAX_LAKE_SIZE);

        let ceiling = (self.rock.height(x, z) - LAKE_ROCK_CLEARANCE).min(LAVA_MAX_Y);
        let surface_y = if ceiling <= LAVA_MIN_Y {
            LAVA_MIN_Y
        } else {
            LAVA_MIN_Y
                + (self.noise.sample(x, 2, z, Channel::LAVA) * (ceiling - LAVA_MIN_Y) as f32)
                    .floor() as i32
        };
        LavaLake { radius, surface_y }
    }

    pub(crate) fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lava(seed: i32, probability: f32) -> LavaField {
        let noise = Arc::new(SeededField::new(seed, 0));
        let rock = Arc::new(RockHeightField::new(noise.clone(), 127));
        LavaField::new(noise, rock, probability, 127)
    }

    #[test]
    fn test_lake_shape() {
        let lake = LavaLake {
            radius: 6,
            surface_y: -20,
        };
        assert!(lake.holds_lava(0, 0, 0));
        assert!(lake.holds_lava(5, 0, 0));
        assert!(!lake.holds_lava(6, 0, 0));
        assert!(lake.holds_lava(0, -1, 0));
        assert!(!lake.holds_lava(0, -2, 0));
        assert!(!lake.holds_lava(0, 1, 0));

        assert!(lake.holds_air(0, 1, 0));
        assert!(lake.holds_air(5, 2, 0));
        assert!(!lake.holds_air(0, 3, 0));
        assert!(!lake.holds_air(0, 0, 0));
    }

    #[test]
    fn test_lakes_are_found_from_every_side() {
        let field = lava(31, 0.02);
        let mut found = 0;
        for x in -64..64 {
            for z in -64..64 {
                let Some(lake) = field.lake_at(x, z) else {
                    continue;
                };
                found += 1;
                assert!((MIN_LAKE_SIZE..=MAX_LAKE_SIZE).contains(&lake.radius));
                assert!((LAVA_MIN_Y..=LAVA_MAX_Y).contains(&lake.surface_y));
                assert!(field.is_lava(x, lake.surface_y, z));
                assert!(field.is_over_lava(x, lake.surface_y + 1, z));
                let edge = lake.radius - 1;
                for (dx, dz) in [(edge, 0), (-edge, 0), (0, edge), (0, -edge)] {
                    assert!(field.is_lava(x + dx, lake.surface_y, z + dz));
                }
            }
        }
        assert!(found > 0);
    }

    #[test]
    fn test_no_lava_outside_depth_band() {
        let field = lava(31, 0.5);
        for x in 0..32 {
            assert!(!field.is_lava(x, LAVA_MAX_Y + 1, 0));
            assert!(!field.is_lava(x, LAVA_MIN_Y - MAX_LAKE_SIZE, 0));
            assert!(!field.is_over_lava(x, LAVA_MIN_Y - 1, 0));
        }
    }

    #[test]
    fn test_lake_list_matches_grid() {
        let field = lava(5, 0.05);
        for tx in -3..3 {
            for tz in -3..3 {
                let tile = field.tile(TileCoordinate::new(tx, 0, tz));
                let present = tile.grid.iter().flatten().filter(|l| l.is_present()).count();
                assert_eq!(present, tile.lakes.len());
                for &(x, z, lake) in tile.lakes.iter() {
                    assert_eq!(
                        TileCoordinate::column(x, z, LAVA_TILE),
                        TileCoordinate::new(tx, 0, tz)
                    );
                    assert_eq!(field.lake_at(x, z), Some(lake));
                }
            }
        }
    }
}
