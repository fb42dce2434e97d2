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

use strata_core::constants::world::WATER_HEIGHT;
use strata_core::coordinates::{BlockCoordinate, TileCoordinate};

use super::caves::CaveField;
use super::rock::RockHeightField;
use crate::foliage::{leaves_radius, tree_shape, TreeVoxel};
use crate::seeded::{Channel, SeededField};
use crate::tile_cache::{CacheStats, TileCache};

pub(crate) const TREE_TILE: i32 = 4;
pub(crate) const TREE_SHAPE_BLOCK: i32 = 4;
pub(crate) const MIN_TREE_HEIGHT: i32 = 4;
pub(crate) const TREE_HEIGHT_VARIATION: i32 = 4;
pub(crate) const MAX_TREE_HEIGHT: i32 = MIN_TREE_HEIGHT + TREE_HEIGHT_VARIATION - 1;
/// Widest canopy of any tree, i.e. the leaves radius of the tallest one.
pub(crate) const MAX_TREE_REACH: i32 = 5;

const SHAPE_VOXELS: usize = (TREE_SHAPE_BLOCK * TREE_SHAPE_BLOCK * TREE_SHAPE_BLOCK) as usize;

type PlacementTile = [[Option<i32>; TREE_TILE as usize]; TREE_TILE as usize];
type ShapeBlock = [TreeVoxel; SHAPE_VOXELS];

#[inline]
fn shape_index(dx: i32, dy: i32, dz: i32) -> usize {
    ((dx * TREE_SHAPE_BLOCK + dz) * TREE_SHAPE_BLOCK + dy) as usize
}

/// Where trees grow, and what they look like once they overlap.
pub(crate) struct TreeField {
    noise: Arc<SeededField>,
    rock: Arc<RockHeightField>,
    caves: Arc<CaveField>,
    tree_probability: f32,
    placement: TileCache<TileCoordinate, PlacementTile>,
    shapes: TileCache<TileCoordinate, ShapeBlock>,
}
impl TreeField {
    pub(crate) fn new(
        noise: Arc<SeededField>,
        rock: Arc<RockHeightField>,
        caves: Arc<CaveField>,
        tree_probability: f32,
        cache_buckets: usize,
    ) -> TreeField {
        TreeField {
            noise,
            rock,
            caves,
            tree_probability,
            placement: TileCache::new("tree_placement", cache_buckets),
            shapes: TileCache::new("tree_shape", cache_buckets),
        }
    }

    /// The height of the tree rooted in column (x, z), if one grows there.
    pub(crate) fn tree_height_at(&self, x: i32, z: i32) -> Option<i32> {
        let tile = self
            .placement
            .get(TileCoordinate::column(x, z, TREE_TILE), |t| {
                let origin = t.origin(TREE_TILE);
                std::array::from_fn(|i| {
                    std::array::from_fn(|j| {
                        self.compute_placement(
                            origin.x.wrapping_add(i as i32),
                            origin.z.wrapping_add(j as i32),
                        )
                    })
                })
            });
        tile[x.rem_euclid(TREE_TILE) as usize][z.rem_euclid(TREE_TILE) as usize]
    }

    /// The height a tree rooted in this column has (or would have, e.g. when grown from a
    /// sapling).
    pub(crate) fn natural_height(&self, x: i32, z: i32) -> i32 {
        MIN_TREE_HEIGHT
            + (self.noise.sample(x, 0, z, Channel::TREE_SIZE) * TREE_HEIGHT_VARIATION as f32)
                .floor() as i32
    }

    fn compute_placement(&self, x: i32, z: i32) -> Option<i32> {
        let ground = self.rock.height(x, z);
        if ground <= WATER_HEIGHT {
            return None;
        }
        if self.noise.sample(x, 0, z, Channel::GEN_TREE) >= self.tree_probability {
            return None;
        }
        if self.caves.is_in_cave(x, ground, z) {
            return None;
        }
        Some(self.natural_height(x, z).min(MAX_TREE_HEIGHT))
    }

    pub(crate) fn voxel_at(&self, x: i32, y: i32, z: i32) -> TreeVoxel {
        let coord = BlockCoordinate::new(x, y, z);
        let block = self
            .shapes
            .get(coord.tile(TREE_SHAPE_BLOCK), |b| self.build_shape(b));
        block[shape_index(
            x.rem_euclid(TREE_SHAPE_BLOCK),
            y.rem_euclid(TREE_SHAPE_BLOCK),
            z.rem_euclid(TREE_SHAPE_BLOCK),
        )]
    }

    fn build_shape(&self, block: TileCoordinate) -> ShapeBlock {
        let origin = block.origin(TREE_SHAPE_BLOCK);
        let far = TREE_SHAPE_BLOCK - 1;
        let mut voxels = [TreeVoxel::Empty; SHAPE_VOXELS];
        for cx in origin.x.saturating_sub(MAX_TREE_REACH)
            ..=origin.x.saturating_add(far + MAX_TREE_REACH)
        {
            for cz in origin.z.saturating_sub(MAX_TREE_REACH)
                ..=origin.z.saturating_add(far + MAX_TREE_REACH)
            {
                let Some(height) = self.tree_height_at(cx, cz) else {
                    continue;
                };
                let base = self.rock.height(cx, cz) + 1;
                let top = base + height + 2 * leaves_radius(height);
                if top < origin.y || base > origin.y.saturating_add(far) {
                    continue;
                }
                for dx in 0..TREE_SHAPE_BLOCK {
                    for dz in 0..TREE_SHAPE_BLOCK {
                        for dy in 0..TREE_SHAPE_BLOCK {
                            let voxel = tree_shape(
                                origin.x.wrapping_add(dx).wrapping_sub(cx),
                                origin.y.wrapping_add(dy).wrapping_sub(base),
                                origin.z.wrapping_add(dz).wrapping_sub(cz),
                                height,
                            );
                            let slot = &mut voxels[shape_index(dx, dy, dz)];
                            *slot = (*slot).max(voxel);
                        }
                    }
                }
            }
        }
        voxels
    }

    pub(crate) fn cache_stats(&self) -> [CacheStats; 2] {
        [self.placement.stats(), self.shapes.stats()]
    }
}
