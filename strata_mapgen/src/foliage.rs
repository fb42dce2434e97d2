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

//! Shapes for trees, cacti and flowers, and the logic for growing them into an existing world.
//!
//! Shapes are pure functions of the offset from the plant's base, so the map generator can ask
//! "what would a tree rooted over there put here?" without touching any world state.

use strata_core::block::{Block, FlowerKind};
use strata_core::coordinates::BlockCoordinate;

/// What a tree puts at a given voxel. Ordered so that combining overlapping trees is `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TreeVoxel {
    #[default]
    Empty,
    Leaves,
    Wood,
}
impl TreeVoxel {
    pub fn block(&self) -> Option<Block> {
        match self {
            TreeVoxel::Empty => None,
            TreeVoxel::Leaves => Some(Block::Leaves),
            TreeVoxel::Wood => Some(Block::Wood),
        }
    }
}

/// Radius of the leaf ball of a tree with the given trunk height.
#[inline]
pub fn leaves_radius(height: i32) -> i32 {
    (0.7 * height as f32).round() as i32
}

/// The tree of the given height rooted at the origin: a trunk from the base up to the middle of
/// a ball of leaves centered `height + R` above the base, where R is [leaves_radius].
pub fn tree_shape(dx: i32, dy: i32, dz: i32, height: i32) -> TreeVoxel {
    let radius = leaves_radius(height);
    let crown = height + radius;
    if dx == 0 && dz == 0 && (0..crown).contains(&dy) {
        return TreeVoxel::Wood;
    }
    let up = dy - crown;
    if dx * dx + up * up + dz * dz <= radius * radius {
        TreeVoxel::Leaves
    } else {
        TreeVoxel::Empty
    }
}

/// Bounding box of a plant relative to its base: `[-radius, radius]` horizontally and
/// `[0, height)` vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlantExtent {
    pub radius: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plant {
    Tree { height: i32 },
    Cactus { height: i32 },
    Flower(FlowerKind),
}
impl Plant {
    /// The block this plant wants at the given offset from its base, if any.
    pub fn voxel_at(&self, dx: i32, dy: i32, dz: i32) -> Option<Block> {
        match *self {
            Plant::Tree { height } => tree_shape(dx, dy, dz, height).block(),
            Plant::Cactus { height } => {
                (dx == 0 && dz == 0 && (0..height).contains(&dy)).then_some(Block::Cactus)
            }
            Plant::Flower(kind) => (dx == 0 && dy == 0 && dz == 0).then_some(Block::Flower(kind)),
        }
    }

    pub fn extent(&self) -> PlantExtent {
        match *self {
            Plant::Tree { height } => {
                let radius = leaves_radius(height);
                PlantExtent {
                    radius,
                    height: height + 2 * radius + 1,
                }
            }
            Plant::Cactus { height } => PlantExtent { radius: 0, height },
            Plant::Flower(_) => PlantExtent {
                radius: 0,
                height: 1,
            },
        }
    }
}

/// Minimal read/write access to a world (or a piece of one) for growing plants into it.
pub trait BlockAccess {
    /// Returns None if the coordinate isn't accessible (e.g. outside a chunk).
    fn get_block(&self, coord: BlockCoordinate) -> Option<Block>;
    /// Writes to inaccessible coordinates are ignored.
    fn set_block(&mut self, coord: BlockCoordinate, block: Block);
}

/// Whether a growing plant may put `new` where `existing` currently is.
///
/// Wood pushes aside anything a plant could grow through; everything else only fills air.
fn may_replace(existing: Block, new: Block) -> bool {
    if existing == new {
        return false;
    }
    match new {
        Block::Wood => existing.is_replaceable_by_plant(),
        _ => existing == Block::Air,
    }
}

/// Grows `plant` with its base at `origin`, merging it into whatever is already there. Returns
/// the number of blocks written.
pub fn grow_plant(world: &mut impl BlockAccess, origin: BlockCoordinate, plant: &Plant) -> usize {
    let extent = plant.extent();
    let mut written = 0;
    for dx in -extent.radius..=extent.radius {
        for dz in -extent.radius..=extent.radius {
            for dy in 0..extent.height {
                let Some(new) = plant.voxel_at(dx, dy, dz) else {
                    continue;
                };
                let Some(coord) = origin.try_delta(dx, dy, dz) else {
                    continue;
                };
                let Some(existing) = world.get_block(coord) else {
                    continue;
                };
                if may_replace(existing, new) {
                    world.set_block(coord, new);
                    written += 1;
                }
            }
        }
    }
    written
}
