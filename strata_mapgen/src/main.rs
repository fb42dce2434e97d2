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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Parser;
use rustc_hash::FxHashMap;
use strata_core::block::Block;
use strata_core::coordinates::BlockCoordinate;
use strata_mapgen::mapgen::ChunkSource;
use strata_mapgen::settings::{self, MapgenSettings};
use strata_mapgen::WorldGenerator;
use tracing::metadata::LevelFilter;
use tracing::info;
use tracing_subscriber::prelude::*;

/// Generates a square of chunks around the origin and reports what ended up in them.
#[derive(Parser, Debug)]
#[command(version)]
struct MapgenArgs {
    /// Directory holding mapgen.ron. Defaults are used if not given.
    #[arg(short, long, value_name = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Overrides the seed from the settings file.
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,

    /// Chunks to generate in each direction from the origin.
    #[arg(short, long, default_value_t = 2)]
    radius: i32,

    #[arg(long, default_value_t = 16)]
    chunk_size: u32,

    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Log every field's value at this position, e.g. `--debug-at 10,-4,3`.
    #[arg(long, value_name = "X,Y,Z", allow_hyphen_values = true)]
    debug_at: Option<BlockCoordinate>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            ),
        )
        .init();

    let args = MapgenArgs::parse();
    ensure!(args.chunk_size > 0, "--chunk-size must be positive");
    ensure!(args.threads > 0, "--threads must be positive");
    ensure!(args.radius >= 0, "--radius must not be negative");

    let mut settings = match &args.data_dir {
        Some(dir) => settings::load(dir)?,
        None => MapgenSettings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;

    #[cfg(feature = "deadlock_detection")]
    spawn_deadlock_watchdog();

    let generator = Arc::new(WorldGenerator::from_settings(&settings));
    let origins = chunk_origins(generator.as_ref(), args.radius, args.chunk_size);
    info!(
        "Generating {} chunks of size {} on {} threads (seed {})",
        origins.len(),
        args.chunk_size,
        args.threads,
        generator.seed()
    );

    let start = Instant::now();
    let histogram = generate_all(generator.clone(), &origins, args.chunk_size, args.threads);
    info!("Generated {} chunks in {:?}", origins.len(), start.elapsed());

    let mut counts: Vec<(Block, u64)> = histogram.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (block, count) in counts {
        info!("{:>12} {}", count, block.short_name());
    }
    for stats in generator.cache_stats() {
        info!(
            "cache {}: {} hits, {} misses ({:.1}% hit rate)",
            stats.name,
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );
    }

    if let Some(pos) = args.debug_at {
        generator.dump_debug(pos);
    }
    Ok(())
}

#[cfg(feature = "deadlock_detection")]
fn spawn_deadlock_watchdog() {
    std::thread::spawn(|| loop {
        std::thread::sleep(std::time::Duration::from_secs(10));
        for (i, threads) in parking_lot::deadlock::check_deadlock().iter().enumerate() {
            for t in threads {
                tracing::error!(
                    "deadlock #{}: thread {:?}\n{:?}",
                    i,
                    t.thread_id(),
                    t.backtrace()
                );
            }
        }
    });
}

/// Origins of the chunks in a square of the given radius around the origin, covering the
/// layers where the generator expects terrain.
fn chunk_origins(source: &dyn ChunkSource, radius: i32, chunk_size: u32) -> Vec<BlockCoordinate> {
    let edge = chunk_size as i32;
    let mut origins = Vec::new();
    for cx in -radius..=radius {
        for cz in -radius..=radius {
            let (x, z) = (cx * edge, cz * edge);
            let range = source
                .terrain_range_hint(x, z, chunk_size)
                .unwrap_or_else(|| {
                    let ground = source.rock_height(x, z);
                    ground..=ground
                });
            let low = range.start().div_euclid(edge);
            let high = range.end().div_euclid(edge);
            for cy in low..=high {
                origins.push(BlockCoordinate::new(x, cy * edge, z));
            }
        }
    }
    origins
}

fn generate_all(
    source: Arc<dyn ChunkSource>,
    origins: &[BlockCoordinate],
    chunk_size: u32,
    threads: usize,
) -> FxHashMap<Block, u64> {
    let per_thread = origins.len().div_ceil(threads).max(1);
    let mut totals = FxHashMap::default();
    std::thread::scope(|s| {
        let handles: Vec<_> = origins
            .chunks(per_thread)
            .map(|batch| {
                let source = source.clone();
                s.spawn(move || {
                    let mut counts: FxHashMap<Block, u64> = FxHashMap::default();
                    for origin in batch {
                        let chunk = source.generate_chunk(*origin, chunk_size);
                        for (block, count) in chunk.histogram() {
                            *counts.entry(block).or_insert(0) += count;
                        }
                    }
                    counts
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(counts) => {
                    for (block, count) in counts {
                        *totals.entry(block).or_insert(0) += count;
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });
    totals
}
