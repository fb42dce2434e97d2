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

/// Vertical extent of the world and related levels. Everything in the map generator is
/// expressed relative to these.
pub mod world {
    /// Number of layers below y = 0. The lowest layer (y = -DEPTH) is bedrock.
    pub const DEPTH: i32 = 64;
    /// Number of layers at or above y = 0.
    pub const HEIGHT: i32 = 64;
    /// Standing water fills every open block at or below this level.
    pub const WATER_HEIGHT: i32 = 0;
    /// The impenetrable bottom layer.
    pub const FLOOR_Y: i32 = -DEPTH;
}

/// Names for the blocks the generator can emit. By using these, consumers can map generated
/// blocks onto their own block registries.
pub mod blocks {
    pub const AIR: &str = "builtin:air";
    pub const BEDROCK: &str = "default:bedrock";
    pub const STONE: &str = "default:stone";
    pub const DIRT: &str = "default:dirt";
    pub const DIRT_WITH_GRASS: &str = "default:dirt_with_grass";
    pub const SAND: &str = "default:sand";
    pub const GRAVEL: &str = "default:gravel";
    pub const WATER: &str = "default:water";
    pub const LAVA: &str = "default:lava";
    pub const WOOD: &str = "default:wood";
    pub const LEAVES: &str = "default:leaves";
    pub const TORCH: &str = "default:torch";
    pub const CHEST: &str = "default:chest";
    pub const CACTUS: &str = "default:cactus";
    pub const SAPLING: &str = "default:sapling";
    pub const DANDELION: &str = "default:dandelion";
    pub const ROSE: &str = "default:rose";

    pub const REDSTONE_ORE: &str = "default:redstone_ore";
    pub const COAL_ORE: &str = "default:coal_ore";
    pub const IRON_ORE: &str = "default:iron_ore";
    pub const GOLD_ORE: &str = "default:gold_ore";
    pub const DIAMOND_ORE: &str = "default:diamond_ore";
    pub const LAPIS_ORE: &str = "default:lapis_ore";
    pub const EMERALD_ORE: &str = "default:emerald_ore";
}
