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

//! Deterministic procedural world generation for strata.
//!
//! A [WorldGenerator] turns an integer seed into an unbounded voxel world: stone terrain with
//! lakes and beaches, caves, underground lava lakes, ores, trees, and the odd torch or chest.
//! Any cube of the world can be generated on demand, from any number of threads, in any order,
//! and always comes out the same.

/// The default map generator and the fields it is built from.
pub mod default_mapgen;
/// Shapes of trees and other plants, and growing them into an existing world.
pub mod foliage;
pub mod generated_chunk;
/// The interface between map generators and their consumers.
pub mod mapgen;
pub mod seeded;
/// Map generator configuration, loaded from the data directory.
pub mod settings;
pub mod tile_cache;

pub use default_mapgen::{SynthesisRule, WorldGenerator};
pub use generated_chunk::GeneratedChunk;
pub use mapgen::ChunkSource;
pub use strata_core::block::Block;
pub use strata_core::coordinates::BlockCoordinate;
