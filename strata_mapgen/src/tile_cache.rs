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

//! A fixed-capacity, direct-mapped cache shared by every derived field of the map generator.
//!
//! Each bucket holds at most one resident tile. A lookup whose key doesn't match the resident
//! tile recomputes the tile and displaces whatever was there; nothing is ever merged or explicitly
//! invalidated. This is only sound because every tile is a pure function of (seed, key): losing a
//! tile and recomputing it must yield identical values.
//!
//! Locking is per bucket, so lookups for tiles in different buckets never contend. The fill
//! routine runs *without* any bucket lock held. Fills are free to consult other caches (or even
//! this one) without any lock-ordering concerns; the price is that two threads racing on the same
//! missing tile may both compute it, which is harmless since they compute the same value.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use strata_core::coordinates::TileCoordinate;

/// Default bucket count. 8191 is prime (2^13 - 1), which keeps the weighted-sum hash from
/// aliasing regular strides of tiles onto the same bucket.
pub const DEFAULT_BUCKETS: usize = 8191;

/// A key that can be placed into a [TileCache].
pub trait TileKey: Copy + Eq + Send + Sync + 'static {
    /// A weighted sum of the key's coordinates. Need not be non-negative; the cache normalizes it.
    /// Neighboring keys should land in nearby (but distinct) buckets.
    fn spatial_hash(&self) -> i64;
}

impl TileKey for TileCoordinate {
    #[inline]
    fn spatial_hash(&self) -> i64 {
        (self.x as i64)
            .wrapping_add((self.z as i64).wrapping_mul(97))
            .wrapping_add((self.y as i64).wrapping_mul(9973))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub name: &'static str,
    pub hits: u64,
    pub misses: u64,
}
impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct TileCache<K: TileKey, V: Clone + Send + Sync> {
    name: &'static str,
    buckets: Box<[Mutex<Option<(K, V)>>]>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: TileKey, V: Clone + Send + Sync> TileCache<K, V> {
    /// Creates an empty cache.
    ///
    /// Panics if `buckets` is zero.
    pub fn new(name: &'static str, buckets: usize) -> Self {
        assert!(buckets > 0, "TileCache {name} needs at least one bucket");
        TileCache {
            name,
            buckets: (0..buckets).map(|_| Mutex::new(None)).collect(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the tile for `key`, computing it with `fill` if it isn't resident.
    #[inline]
    pub fn get(&self, key: K, fill: impl FnOnce(K) -> V) -> V {
        let bucket = &self.buckets[self.bucket_index(key)];
        {
            let resident = bucket.lock();
            if let Some((resident_key, value)) = resident.as_ref() {
                if *resident_key == key {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return value.clone();
                }
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = fill(key);
        *bucket.lock() = Some((key, value.clone()));
        value
    }

    /// Returns true if `key` is currently resident. Only meaningful for tests and diagnostics,
    /// since any other thread may evict it immediately afterwards.
    pub fn is_resident(&self, key: K) -> bool {
        self.buckets[self.bucket_index(key)]
            .lock()
            .as_ref()
            .is_some_and(|(resident_key, _)| *resident_key == key)
    }

    #[inline]
    pub fn bucket_index(&self, key: K) -> usize {
        key.spatial_hash().rem_euclid(self.buckets.len() as i64) as usize
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Drops every resident tile. Subsequent lookups recompute from scratch.
    pub fn clear(&self) {
        for bucket in self.buckets.iter() {
            *bucket.lock() = None;
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_hit_after_fill() {
        let cache: TileCache<TileCoordinate, i32> = TileCache::new("test", 31);
        let key = TileCoordinate::new(1, 2, 3);
        assert_eq!(cache.get(key, |k| k.x + k.y + k.z), 6);
        assert!(cache.is_resident(key));
        assert_eq!(cache.get(key, |_| panic!("should have been resident")), 6);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_colliding_keys_displace_each_other() {
        let cache: TileCache<TileCoordinate, i32> = TileCache::new("test", 1);
        let fills = AtomicUsize::new(0);
        let fill = |k: TileCoordinate| {
            fills.fetch_add(1, Ordering::Relaxed);
            k.x * 10
        };
        let a = TileCoordinate::new(1, 0, 0);
        let b = TileCoordinate::new(2, 0, 0);
        assert_eq!(cache.get(a, fill), 10);
        assert_eq!(cache.get(b, fill), 20);
        assert!(!cache.is_resident(a));
        // a was displaced, and comes back identical
        assert_eq!(cache.get(a, fill), 10);
        assert_eq!(fills.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_negative_hashes_normalized() {
        let cache: TileCache<TileCoordinate, ()> = TileCache::new("test", 8191);
        for key in [
            TileCoordinate::new(-1, 0, 0),
            TileCoordinate::new(i32::MIN, i32::MIN, i32::MIN),
            TileCoordinate::new(0, -5, -100),
        ] {
            assert!(cache.bucket_index(key) < cache.bucket_count());
        }
    }

    #[test]
    fn test_neighbors_use_distinct_buckets() {
        let cache: TileCache<TileCoordinate, ()> = TileCache::new("test", DEFAULT_BUCKETS);
        let mut seen = std::collections::HashSet::new();
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..4 {
                    assert!(seen.insert(cache.bucket_index(TileCoordinate::new(x, y, z))));
                }
            }
        }
    }

    #[test]
    fn test_fill_may_reenter_same_cache() {
        let cache: TileCache<TileCoordinate, i32> = TileCache::new("test", 7);
        let outer = TileCoordinate::new(5, 0, 0);
        let value = cache.get(outer, |k| {
            // Same bucket and different bucket lookups from inside a fill must not deadlock.
            cache.get(TileCoordinate::new(k.x + 7, 0, 0), |_| 1)
                + cache.get(TileCoordinate::new(k.x + 1, 0, 0), |_| 2)
        });
        assert_eq!(value, 3);
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let cache: TileCache<TileCoordinate, i64> = TileCache::new("test", 13);
        std::thread::scope(|s| {
            for t in 0..4 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..2000 {
                        let key = TileCoordinate::new((i * (t + 1)) % 50, 0, i % 7);
                        let expected = key.x as i64 * 1000 + key.z as i64;
                        assert_eq!(cache.get(key, |k| k.x as i64 * 1000 + k.z as i64), expected);
                    }
                });
            }
        });
    }
}
