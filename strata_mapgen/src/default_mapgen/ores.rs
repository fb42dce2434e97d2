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

//! Table lookups mapping a noise draw to an ore, a cave decoration, or a chest's contents.

use strata_core::block::{Block, OreKind};
use strata_core::coordinates::BlockCoordinate;
use strata_core::items::{ChestInventory, ItemKind};

use crate::seeded::{Channel, SeededField};

pub const ORE_DRAW_COUNT: u32 = 2000;

/// Draw ranges for each ore, and the depth the ore must be below. A draw outside every range, or
/// one whose ore is too shallow, gives plain stone.
const ORE_TABLE: [(u32, u32, OreKind, Option<i32>); 7] = [
    (0, 20, OreKind::Redstone, Some(-16)),
    (20, 60, OreKind::Coal, None),
    (60, 80, OreKind::Iron, Some(0)),
    (80, 86, OreKind::Gold, Some(-32)),
    (86, 89, OreKind::Diamond, Some(-36)),
    (89, 93, OreKind::Lapis, Some(-24)),
    (93, 94, OreKind::Emerald, Some(-40)),
];

pub fn ore_for_draw(draw: u32, y: i32) -> Block {
    for (start, end, ore, below) in ORE_TABLE {
        if (start..end).contains(&draw) {
            return match below {
                Some(limit) if y >= limit => Block::Stone,
                _ => Block::Ore(ore),
            };
        }
    }
    Block::Stone
}

pub(crate) fn ore_draw(noise: &SeededField, x: i32, y: i32, z: i32) -> u32 {
    let draw = noise.sample(x, y, z, Channel::ORE_TYPE) * ORE_DRAW_COUNT as f32;
    (draw as u32).min(ORE_DRAW_COUNT - 1)
}

pub(crate) fn ore_at(noise: &SeededField, x: i32, y: i32, z: i32) -> Block {
    ore_for_draw(ore_draw(noise, x, y, z), y)
}

pub const DECORATION_COUNT: u32 = 2;
const CHEST_THRESHOLD: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoration {
    None,
    Torch,
    Chest,
}

/// Maps a decoration sample to a decoration. Torches are only chosen if `torch_allowed` says
/// so; it is only consulted when a torch would otherwise be placed.
pub fn decoration_for_sample(
    sample: f32,
    probability: f32,
    torch_allowed: impl FnOnce() -> bool,
) -> Decoration {
    if sample >= probability {
        return Decoration::None;
    }
    let v = sample / probability * DECORATION_COUNT as f32;
    match v.floor() as u32 {
        0 => {
            if torch_allowed() {
                Decoration::Torch
            } else {
                Decoration::None
            }
        }
        1 if v.fract() < CHEST_THRESHOLD => Decoration::Chest,
        _ => Decoration::None,
    }
}

/// Rolls the contents of a chest at `coord`. Each item kind allowed at this depth gets an
/// independent count in `[0, max]`.
pub fn chest_loot(noise: &SeededField, coord: BlockCoordinate) -> ChestInventory {
    let mut inventory = ChestInventory::new();
    for (i, item) in ItemKind::ALL.iter().enumerate() {
        let max = item.max_chest_count(coord.y);
        if max == 0 {
            continue;
        }
        let roll = noise.sample(
            coord.x,
            coord.y,
            coord.z,
            Channel::CAVE_DECORATION_CHEST.sub(i as u32),
        );
        let count = ((roll * (max + 1) as f32).floor() as u32).min(max);
        inventory.add(*item, count);
    }
    inventory
}
