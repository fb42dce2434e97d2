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

//! Caves are carved by sparse primitives (spheres and straight tunnels), each anchored on a
//! single column. Since a primitive can reach well beyond its own column, "is this voxel in a
//! cave" is answered from a second cache of small occupancy blocks, each built by scanning every
//! primitive that could touch it.

use std::sync::Arc;

use cgmath::{InnerSpace, Vector3};
use strata_core::constants::world::DEPTH;
use strata_core::coordinates::{BlockCoordinate, TileCoordinate};

use super::rock::RockHeightField;
use crate::seeded::{Channel, SeededField};
use crate::tile_cache::{CacheStats, TileCache};

pub(crate) const CAVE_TILE: i32 = 4;
pub(crate) const OCCUPANCY_BLOCK: i32 = 4;

/// Radii are measured in quarter-blocks.
pub(crate) const MIN_CAVE_RADIUS: i32 = 8;
pub(crate) const MAX_CAVE_RADIUS: i32 = 32;
/// Furthest a primitive can reach from its anchor in any direction: a maximal tunnel extends
/// half its radius along the axis, plus the tunnel's own thickness.
pub(crate) const MAX_CAVE_REACH: i32 = 17;
// How far below the surface a primitive's center may sink, beyond its own radius.
const MAX_CAVE_DEPTH: f32 = 40.0;
const SPHERE_FRACTION: f32 = 0.4;
const HEADING_FRACTION: f32 = 0.15;
const AXIS_WOBBLE: f32 = 0.25;
const AXIS_VERTICAL_SCALE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunnelHeading {
    AlongX,
    AlongZ,
    Diagonal,
    AntiDiagonal,
}
impl TunnelHeading {
    pub const ALL: [TunnelHeading; 4] = [
        TunnelHeading::AlongX,
        TunnelHeading::AlongZ,
        TunnelHeading::Diagonal,
        TunnelHeading::AntiDiagonal,
    ];

    /// Horizontal (x, z) direction, not normalized.
    fn direction(&self) -> (f32, f32) {
        match self {
            TunnelHeading::AlongX => (1.0, 0.0),
            TunnelHeading::AlongZ => (0.0, 1.0),
            TunnelHeading::Diagonal => (1.0, 1.0),
            TunnelHeading::AntiDiagonal => (1.0, -1.0),
        }
    }

    /// Perturbs the heading by `wobble` and normalizes it. The vertical component is quantized
    /// to sixteenths before normalization.
    pub(crate) fn axis(&self, wobble: Vector3<f32>) -> Vector3<f32> {
        let (hx, hz) = self.direction();
        let vertical = (wobble.y * AXIS_VERTICAL_SCALE * 16.0).round() / 16.0;
        Vector3::new(hx + AXIS_WOBBLE * wobble.x, vertical, hz + AXIS_WOBBLE * wobble.z)
            .normalize()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CavePrimitive {
    Empty,
    Sphere {
        center_y: i32,
        radius: i32,
    },
    Tunnel {
        heading: TunnelHeading,
        center_y: i32,
        radius: i32,
        /// Unit vector along the tunnel.
        axis: Vector3<f32>,
    },
}
impl CavePrimitive {
    fn center_y(&self) -> Option<i32> {
        match self {
            CavePrimitive::Empty => None,
            CavePrimitive::Sphere { center_y, .. } | CavePrimitive::Tunnel { center_y, .. } => {
                Some(*center_y)
            }
        }
    }

    /// Whether the voxel at `offset` from the primitive's center is carved out.
    pub(crate) fn contains(&self, offset: Vector3<f32>) -> bool {
        match *self {
            CavePrimitive::Empty => false,
            CavePrimitive::Sphere { radius, .. } => {
                let r = radius as f32 / 4.0;
                offset.magnitude2() < r * r
            }
            CavePrimitive::Tunnel { radius, axis, .. } => {
                let along = offset.dot(axis);
                if along.abs() >= radius as f32 / 2.0 {
                    return false;
                }
                (offset - axis * along).magnitude() < radius as f32 / 16.0
            }
        }
    }
}

type CaveTile = Arc<[[CavePrimitive; CAVE_TILE as usize]; CAVE_TILE as usize]>;

pub(crate) struct CaveField {
    noise: Arc<SeededField>,
    rock: Arc<RockHeightField>,
    cave_probability: f32,
    primitives: TileCache<TileCoordinate, CaveTile>,
    /// One bit per voxel of a 4x4x4 block, see [occupancy_bit].
    occupancy: TileCache<TileCoordinate, u64>,
}

#[inline]
fn occupancy_bit(dx: i32, dy: i32, dz: i32) -> u64 {
    1 << ((dx * OCCUPANCY_BLOCK + dz) * OCCUPANCY_BLOCK + dy)
}

impl CaveField {
    pub(crate) fn new(
        noise: Arc<SeededField>,
        rock: Arc<RockHeightField>,
        cave_probability: f32,
        cache_buckets: usize,
    ) -> CaveField {
        CaveField {
            noise,
            rock,
            cave_probability,
            primitives: TileCache::new("cave_primitives", cache_buckets),
            occupancy: TileCache::new("cave_occupancy", cache_buckets),
        }
    }

    pub(crate) fn is_in_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let coord = BlockCoordinate::new(x, y, z);
        let bits = self
            .occupancy
            .get(coord.tile(OCCUPANCY_BLOCK), |b| self.build_occupancy(b));
        bits & occupancy_bit(
            x.rem_euclid(OCCUPANCY_BLOCK),
            y.rem_euclid(OCCUPANCY_BLOCK),
            z.rem_euclid(OCCUPANCY_BLOCK),
        ) != 0
    }

    pub(crate) fn primitive_at(&self, x: i32, z: i32) -> CavePrimitive {
        let tile = self
            .primitives
            .get(TileCoordinate::column(x, z, CAVE_TILE), |t| self.fill_primitives(t));
        tile[x.rem_euclid(CAVE_TILE) as usize][z.rem_euclid(CAVE_TILE) as usize]
    }

    fn fill_primitives(&self, tile: TileCoordinate) -> CaveTile {
        let origin = tile.origin(CAVE_TILE);
        Arc::new(std::array::from_fn(|i| {
            std::array::from_fn(|j| {
                self.compute_primitive(
                    origin.x.wrapping_add(i as i32),
                    origin.z.wrapping_add(j as i32),
                )
            })
        }))
    }

    fn compute_primitive(&self, x: i32, z: i32) -> CavePrimitive {
        let selector = self.noise.sample(x, 0, z, Channel::CAVE);
        if selector >= self.cave_probability {
            return CavePrimitive::Empty;
        }
        let kind = selector / self.cave_probability;

        let radius_range = (MAX_CAVE_RADIUS - MIN_CAVE_RADIUS + 1) as f32;
        let radius = (MIN_CAVE_RADIUS
            + (self.noise.sample(x, 2, z, Channel::CAVE) * radius_range).floor() as i32)
            .min(MAX_CAVE_RADIUS);
        let sink = (self.noise.sample(x, 1, z, Channel::CAVE) * MAX_CAVE_DEPTH).floor() as i32;
        let center_y = (self.rock.height(x, z) - radius / 4 - sink).max(2 - DEPTH);

        if kind < SPHERE_FRACTION {
            return CavePrimitive::Sphere { center_y, radius };
        }
        let heading_index = (((kind - SPHERE_FRACTION) / HEADING_FRACTION).floor() as usize)
            .min(TunnelHeading::ALL.len() - 1);
        let heading = TunnelHeading::ALL[heading_index];
        CavePrimitive::Tunnel {
            heading,
            center_y,
            radius,
            axis: heading.axis(self.noise.sample_vector(x, 0, z)),
        }
    }

    fn build_occupancy(&self, block: TileCoordinate) -> u64 {
        let origin = block.origin(OCCUPANCY_BLOCK);
        let far = OCCUPANCY_BLOCK - 1;
        let low = TileCoordinate::column(
            origin.x.saturating_sub(MAX_CAVE_REACH),
            origin.z.saturating_sub(MAX_CAVE_REACH),
            CAVE_TILE,
        );
        let high = TileCoordinate::column(
            origin.x.saturating_add(far + MAX_CAVE_REACH),
            origin.z.saturating_add(far + MAX_CAVE_REACH),
            CAVE_TILE,
        );

        let mut bits = 0u64;
        for tx in low.x..=high.x {
            for tz in low.z..=high.z {
                let tile_coord = TileCoordinate::new(tx, 0, tz);
                let tile_origin = tile_coord.origin(CAVE_TILE);
                let tile = self
                    .primitives
                    .get(tile_coord, |t| self.fill_primitives(t));
                for (i, row) in tile.iter().enumerate() {
                    for (j, primitive) in row.iter().enumerate() {
                        let Some(center_y) = primitive.center_y() else {
                            continue;
                        };
                        let center_x = tile_origin.x.wrapping_add(i as i32);
                        let center_z = tile_origin.z.wrapping_add(j as i32);
                        if !within_reach(center_x, origin.x)
                            || !within_reach(center_y, origin.y)
                            || !within_reach(center_z, origin.z)
                        {
                            continue;
                        }
                        for dx in 0..OCCUPANCY_BLOCK {
                            for dz in 0..OCCUPANCY_BLOCK {
                                for dy in 0..OCCUPANCY_BLOCK {
                                    let bit = occupancy_bit(dx, dy, dz);
                                    if bits & bit != 0 {
                                        continue;
                                    }
                                    let offset = Vector3::new(
                                        origin.x.wrapping_add(dx).wrapping_sub(center_x) as f32,
                                        origin.y.wrapping_add(dy).wrapping_sub(center_y) as f32,
                                        origin.z.wrapping_add(dz).wrapping_sub(center_z) as f32,
                                    );
                                    if primitive.contains(offset) {
                                        bits |= bit;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        bits
    }

    pub(crate) fn cache_stats(&self) -> [CacheStats; 2] {
        [self.primitives.stats(), self.occupancy.stats()]
    }

    #[cfg(test)]
    pub(crate) fn clear_caches(&self) {
        self.primitives.clear();
        self.occupancy.clear();
    }
}

/// Whether a primitive anchored at `center` can reach any voxel of the block spanning
/// `[block_start, block_start + OCCUPANCY_BLOCK)` along one axis.
#[inline]
fn within_reach(center: i32, block_start: i32) -> bool {
    let start = block_start as i64;
    let center = center as i64;
    center >= start - MAX_CAVE_REACH as i64
        && center <= start + (OCCUPANCY_BLOCK - 1 + MAX_CAVE_REACH) as i64
}
