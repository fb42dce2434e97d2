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

/// Items that can show up in generated chests.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ItemKind {
    Torch,
    Bread,
    Sapling,
    Coal,
    IronIngot,
    Redstone,
    GoldIngot,
    Lapis,
    Diamond,
    Emerald,
}
impl ItemKind {
    pub const ALL: [ItemKind; 10] = [
        ItemKind::Torch,
        ItemKind::Bread,
        ItemKind::Sapling,
        ItemKind::Coal,
        ItemKind::IronIngot,
        ItemKind::Redstone,
        ItemKind::GoldIngot,
        ItemKind::Lapis,
        ItemKind::Diamond,
        ItemKind::Emerald,
    ];

    /// The largest stack of this item a chest at layer `y` may hold. Zero means the item
    /// never appears at that depth.
    pub const fn max_chest_count(&self, y: i32) -> u32 {
        match self {
            ItemKind::Torch => 8,
            ItemKind::Bread => 4,
            ItemKind::Sapling => {
                if y > -16 {
                    2
                } else {
                    0
                }
            }
            ItemKind::Coal => 12,
            ItemKind::IronIngot => {
                if y < 0 {
                    6
                } else {
                    2
                }
            }
            ItemKind::Redstone => {
                if y < -16 {
                    8
                } else {
                    0
                }
            }
            ItemKind::GoldIngot => {
                if y < -24 {
                    4
                } else {
                    0
                }
            }
            ItemKind::Lapis => {
                if y < -24 {
                    6
                } else {
                    0
                }
            }
            ItemKind::Diamond => {
                if y < -40 {
                    2
                } else {
                    0
                }
            }
            ItemKind::Emerald => {
                if y < -48 {
                    1
                } else {
                    0
                }
            }
        }
    }
}

/// Contents of a generated chest. Stacks are kept in [ItemKind::ALL] order and never hold
/// a zero count.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ChestInventory {
    stacks: Vec<(ItemKind, u32)>,
}
impl ChestInventory {
    pub fn new() -> ChestInventory {
        ChestInventory { stacks: Vec::new() }
    }

    /// Adds `count` of `item`, merging with an existing stack of the same item.
    pub fn add(&mut self, item: ItemKind, count: u32) {
        if count == 0 {
            return;
        }
        match self.stacks.binary_search_by_key(&item, |(kind, _)| *kind) {
            Ok(idx) => self.stacks[idx].1 += count,
            Err(idx) => self.stacks.insert(idx, (item, count)),
        }
    }

    pub fn count_of(&self, item: ItemKind) -> u32 {
        self.stacks
            .iter()
            .find(|(kind, _)| *kind == item)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.stacks.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
