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

use rustc_hash::FxHashMap;
use strata_core::block::Block;
use strata_core::coordinates::BlockCoordinate;
use strata_core::items::ChestInventory;

use crate::foliage::BlockAccess;

/// A cube of generated blocks, plus the contents of any chests in it.
///
/// Blocks are stored x-major, then z, then y, so that a vertical column is contiguous.
#[derive(Clone, PartialEq)]
pub struct GeneratedChunk {
    origin: BlockCoordinate,
    size: u32,
    blocks: Box<[Block]>,
    chests: FxHashMap<BlockCoordinate, ChestInventory>,
}

impl GeneratedChunk {
    /// Creates a chunk full of air.
    ///
    /// Panics if `size` is zero, or if the chunk would extend past the end of the coordinate
    /// space.
    pub fn new(origin: BlockCoordinate, size: u32) -> GeneratedChunk {
        assert!(size > 0, "chunk size must be positive");
        let extent = size as i32 - 1;
        assert!(
            origin.try_delta(extent, extent, extent).is_some(),
            "chunk of size {size} at {origin:?} overflows the coordinate space"
        );
        let volume = (size as usize)
            .checked_pow(3)
            .unwrap_or_else(|| panic!("chunk of size {size} is too large"));
        GeneratedChunk {
            origin,
            size,
            blocks: vec![Block::Air; volume].into_boxed_slice(),
            chests: FxHashMap::default(),
        }
    }

    pub fn origin(&self) -> BlockCoordinate {
        self.origin
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, coord: BlockCoordinate) -> bool {
        let size = self.size as i64;
        let within = |c: i32, o: i32| (0..size).contains(&(c as i64 - o as i64));
        within(coord.x, self.origin.x)
            && within(coord.y, self.origin.y)
            && within(coord.z, self.origin.z)
    }

    #[inline]
    fn index(&self, coord: BlockCoordinate) -> usize {
        assert!(
            self.contains(coord),
            "{coord:?} is outside the chunk at {:?} with size {}",
            self.origin,
            self.size
        );
        let size = self.size as usize;
        let dx = (coord.x - self.origin.x) as usize;
        let dy = (coord.y - self.origin.y) as usize;
        let dz = (coord.z - self.origin.z) as usize;
        (dx * size + dz) * size + dy
    }

    /// Panics if `coord` is outside this chunk.
    pub fn get_block(&self, coord: BlockCoordinate) -> Block {
        self.blocks[self.index(coord)]
    }

    /// Panics if `coord` is outside this chunk.
    pub fn set_block(&mut self, coord: BlockCoordinate, block: Block) {
        let index = self.index(coord);
        self.blocks[index] = block;
        if block != Block::Chest {
            self.chests.remove(&coord);
        }
    }

    pub fn chest_at(&self, coord: BlockCoordinate) -> Option<&ChestInventory> {
        self.chests.get(&coord)
    }

    /// Panics if `coord` is outside this chunk or doesn't hold a chest.
    pub fn set_chest(&mut self, coord: BlockCoordinate, contents: ChestInventory) {
        assert_eq!(
            self.get_block(coord),
            Block::Chest,
            "no chest at {coord:?} to fill"
        );
        self.chests.insert(coord, contents);
    }

    pub fn chests(&self) -> impl Iterator<Item = (&BlockCoordinate, &ChestInventory)> {
        self.chests.iter()
    }

    /// Every block in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockCoordinate, Block)> + '_ {
        let size = self.size as i32;
        let origin = self.origin;
        (0..size)
            .flat_map(move |dx| (0..size).flat_map(move |dz| (0..size).map(move |dy| (dx, dy, dz))))
            .zip(self.blocks.iter())
            .map(move |((dx, dy, dz), block)| {
                (
                    BlockCoordinate::new(origin.x + dx, origin.y + dy, origin.z + dz),
                    *block,
                )
            })
    }

    /// How many of each block the chunk holds.
    pub fn histogram(&self) -> FxHashMap<Block, u64> {
        let mut counts = FxHashMap::default();
        for block in self.blocks.iter() {
            *counts.entry(*block).or_insert(0) += 1;
        }
        counts
    }
}

impl std::fmt::Debug for GeneratedChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedChunk")
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("chests", &self.chests.len())
            .finish_non_exhaustive()
    }
}

impl BlockAccess for GeneratedChunk {
    fn get_block(&self, coord: BlockCoordinate) -> Option<Block> {
        self.contains(coord).then(|| self.blocks[self.index(coord)])
    }

    fn set_block(&mut self, coord: BlockCoordinate, block: Block) {
        if self.contains(coord) {
            GeneratedChunk::set_block(self, coord, block);
        }
    }
}
