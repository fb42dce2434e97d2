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

//! Deterministic pseudo-random samples keyed by (seed, x, y, z, channel).
//!
//! Everything random in the map generator flows through [SeededField]. There is no hidden
//! state: asking for the same key twice, from any thread, in any order, always gives the same
//! answer.

use cgmath::{InnerSpace, Vector3};

use crate::tile_cache::{TileCache, TileKey};

/// Selects an independent stream of samples. Distinct channels at the same coordinate are
/// uncorrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u32);

impl Channel {
    pub const ROCK_HEIGHT: Channel = Channel(0x000);
    pub const LAKE_BED_TYPE: Channel = Channel(0x100);
    pub const GEN_TREE: Channel = Channel(0x200);
    pub const TREE_SIZE: Channel = Channel(0x300);
    pub const LAVA: Channel = Channel(0x400);
    pub const ORE_TYPE: Channel = Channel(0x500);
    pub const CAVE: Channel = Channel(0x600);
    pub const CAVE_DECORATION: Channel = Channel(0x700);
    /// Per-item loot counts use consecutive sub-channels starting here.
    pub const CAVE_DECORATION_CHEST: Channel = Channel(0x800);
    /// Rejection-sampled vectors consume three channels per attempt starting here.
    pub const VECTOR_BASE: Channel = Channel(0x8000_0000);

    /// The `n`th channel after this one.
    #[inline]
    pub const fn sub(self, n: u32) -> Channel {
        Channel(self.0.wrapping_add(n))
    }
}

// 48-bit linear-congruential constants, the same ones java.util.Random made famous.
const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

#[inline]
fn step(state: u64) -> u64 {
    state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK
}

#[inline]
fn absorb(state: u64, word: u32) -> u64 {
    let state = step(state ^ word as u64);
    step(state ^ (state >> 24))
}

/// The raw hash behind [SeededField::sample]. Uniform in [0, 1), with 24 bits of resolution.
#[inline]
pub fn hash_sample(seed: i32, x: i32, y: i32, z: i32, channel: Channel) -> f32 {
    let mut state = (seed as u32 as u64 ^ MULTIPLIER) & MASK;
    state = absorb(state, x as u32);
    state = absorb(state, y as u32);
    state = absorb(state, z as u32);
    state = absorb(state, channel.0);
    state = step(step(state));
    // 48 - 24 = 24 bits, which fits the f32 mantissa exactly; the result is strictly below 1.
    (state >> 24) as f32 / (1u32 << 24) as f32
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct SampleKey {
    x: i32,
    y: i32,
    z: i32,
    channel: Channel,
}
impl TileKey for SampleKey {
    #[inline]
    fn spatial_hash(&self) -> i64 {
        (self.x as i64)
            .wrapping_add((self.z as i64).wrapping_mul(31))
            .wrapping_add((self.y as i64).wrapping_mul(961))
            .wrapping_add((self.channel.0 as i64).wrapping_mul(29791))
    }
}

pub struct SeededField {
    seed: i32,
    memo: Option<TileCache<SampleKey, f32>>,
}

impl SeededField {
    /// Creates a field for `seed`. When `memo_buckets` is nonzero, samples are memoized by exact
    /// key in a cache of that many buckets.
    pub fn new(seed: i32, memo_buckets: usize) -> SeededField {
        SeededField {
            seed,
            memo: (memo_buckets > 0).then(|| TileCache::new("samples", memo_buckets)),
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// A uniform sample in [0, 1).
    #[inline]
    pub fn sample(&self, x: i32, y: i32, z: i32, channel: Channel) -> f32 {
        match &self.memo {
            Some(memo) => memo.get(SampleKey { x, y, z, channel }, |k| {
                hash_sample(self.seed, k.x, k.y, k.z, k.channel)
            }),
            None => hash_sample(self.seed, x, y, z, channel),
        }
    }

    /// A random vector inside the unit ball, excluding a tiny region around the origin so that it
    /// can always be normalized.
    ///
    /// Candidates are drawn from [-1, 1)^3 and rejected until one lands inside the ball. Attempt
    /// `n` uses channels `VECTOR_BASE + 3n .. VECTOR_BASE + 3n + 3`.
    pub fn sample_vector(&self, x: i32, y: i32, z: i32) -> Vector3<f32> {
        let mut channel = Channel::VECTOR_BASE;
        loop {
            let candidate = Vector3::new(
                self.sample(x, y, z, channel) * 2.0 - 1.0,
                self.sample(x, y, z, channel.sub(1)) * 2.0 - 1.0,
                self.sample(x, y, z, channel.sub(2)) * 2.0 - 1.0,
            );
            let magnitude2 = candidate.magnitude2();
            if (1e-8..=1.0).contains(&magnitude2) {
                return candidate;
            }
            channel = channel.sub(3);
        }
    }

    /// Bilinear interpolation of the lattice samples at the four integer (x, z) points
    /// surrounding the given position, at layer `y`.
    pub fn interpolated(&self, x: f64, z: f64, y: i32, channel: Channel) -> f32 {
        let (x0, z0) = (x.floor(), z.floor());
        let (fx, fz) = ((x - x0) as f32, (z - z0) as f32);
        let (ix, iz) = (x0 as i32, z0 as i32);
        let c00 = self.sample(ix, y, iz, channel);
        let c10 = self.sample(ix.wrapping_add(1), y, iz, channel);
        let c01 = self.sample(ix, y, iz.wrapping_add(1), channel);
        let c11 = self.sample(ix.wrapping_add(1), y, iz.wrapping_add(1), channel);
        let near = c00 + (c10 - c00) * fx;
        let far = c01 + (c11 - c01) * fx;
        near + (far - near) * fz
    }

    pub fn memo_stats(&self) -> Option<crate::tile_cache::CacheStats> {
        self.memo.as_ref().map(TileCache::stats)
    }
}
