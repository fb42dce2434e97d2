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

use std::ops::RangeInclusive;

use strata_core::coordinates::BlockCoordinate;

use crate::generated_chunk::GeneratedChunk;

pub trait ChunkSource: Send + Sync {
    /// Generate the cube of blocks with the given lowest corner and edge length.
    ///
    /// Implementations must be pure functions of their configuration: the same origin and size
    /// always produce the same chunk, no matter which chunks were generated before, in what
    /// order, or on which threads. Neighboring chunks must agree along their shared faces, since
    /// features (caves, canopies, lava lakes) freely cross chunk boundaries.
    ///
    /// Panics if `size` is zero.
    fn generate_chunk(&self, origin: BlockCoordinate, size: u32) -> GeneratedChunk;

    /// Height of the topmost solid rock in column (x, z). Useful for placing things on the
    /// surface without generating whole chunks.
    fn rock_height(&self, x: i32, z: i32) -> i32;

    /// Provide an estimate of block Y values where terrain is most likely to be seen in the
    /// `size` x `size` footprint starting at (x, z), or None for no hint.
    ///
    /// Favor speed over exact precision, but prefer to err on the side of including a layer in
    /// the range if unsure.
    fn terrain_range_hint(&self, _x: i32, _z: i32, _size: u32) -> Option<RangeInclusive<i32>> {
        None
    }

    /// Prints debugging information regarding map generation at the given position.
    ///
    /// By default, does nothing.
    fn dump_debug(&self, _pos: BlockCoordinate) {}
}
