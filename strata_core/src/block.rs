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

use std::fmt::Debug;

use anyhow::Result;
use thiserror::Error;

use crate::constants::blocks::*;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Block type `{0}` is not known to the map generator")]
    UnknownName(String),
}

/// Ores that can be embedded in stone.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OreKind {
    Redstone,
    Coal,
    Iron,
    Gold,
    Diamond,
    Lapis,
    Emerald,
}
impl OreKind {
    pub const ALL: [OreKind; 7] = [
        OreKind::Redstone,
        OreKind::Coal,
        OreKind::Iron,
        OreKind::Gold,
        OreKind::Diamond,
        OreKind::Lapis,
        OreKind::Emerald,
    ];
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FlowerKind {
    Dandelion,
    Rose,
}

/// A single voxel emitted by the map generator.
///
/// This is deliberately a closed set: the generator only knows about the blocks it places. Any
/// richer block registry (textures, physics, etc) lives with the consumer, which can map blocks
/// across using [Block::short_name].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Block {
    #[default]
    Air,
    Bedrock,
    Stone,
    Dirt,
    Grass,
    Sand,
    Gravel,
    Water,
    Lava,
    Wood,
    Leaves,
    Torch,
    /// The contents live in the chunk's chest table, keyed by coordinate.
    Chest,
    Cactus,
    Sapling,
    Flower(FlowerKind),
    Ore(OreKind),
}

impl Block {
    pub const fn short_name(&self) -> &'static str {
        match self {
            Block::Air => AIR,
            Block::Bedrock => BEDROCK,
            Block::Stone => STONE,
            Block::Dirt => DIRT,
            Block::Grass => DIRT_WITH_GRASS,
            Block::Sand => SAND,
            Block::Gravel => GRAVEL,
            Block::Water => WATER,
            Block::Lava => LAVA,
            Block::Wood => WOOD,
            Block::Leaves => LEAVES,
            Block::Torch => TORCH,
            Block::Chest => CHEST,
            Block::Cactus => CACTUS,
            Block::Sapling => SAPLING,
            Block::Flower(FlowerKind::Dandelion) => DANDELION,
            Block::Flower(FlowerKind::Rose) => ROSE,
            Block::Ore(OreKind::Redstone) => REDSTONE_ORE,
            Block::Ore(OreKind::Coal) => COAL_ORE,
            Block::Ore(OreKind::Iron) => IRON_ORE,
            Block::Ore(OreKind::Gold) => GOLD_ORE,
            Block::Ore(OreKind::Diamond) => DIAMOND_ORE,
            Block::Ore(OreKind::Lapis) => LAPIS_ORE,
            Block::Ore(OreKind::Emerald) => EMERALD_ORE,
        }
    }

    pub fn from_short_name(name: &str) -> Result<Block> {
        Self::all()
            .find(|b| b.short_name() == name)
            .ok_or_else(|| BlockError::UnknownName(name.to_string()).into())
    }

    /// Every block the generator knows about, in declaration order.
    pub fn all() -> impl Iterator<Item = Block> {
        [
            Block::Air,
            Block::Bedrock,
            Block::Stone,
            Block::Dirt,
            Block::Grass,
            Block::Sand,
            Block::Gravel,
            Block::Water,
            Block::Lava,
            Block::Wood,
            Block::Leaves,
            Block::Torch,
            Block::Chest,
            Block::Cactus,
            Block::Sapling,
            Block::Flower(FlowerKind::Dandelion),
            Block::Flower(FlowerKind::Rose),
        ]
        .into_iter()
        .chain(OreKind::ALL.into_iter().map(Block::Ore))
    }

    /// Whether a growing plant's trunk may overwrite this block.
    #[inline]
    pub const fn is_replaceable_by_plant(&self) -> bool {
        matches!(
            self,
            Block::Air | Block::Leaves | Block::Sapling | Block::Flower(_)
        )
    }
}

impl Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}
