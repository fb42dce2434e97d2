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

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile_cache::DEFAULT_BUCKETS;

/// Tunables for the map generator. Changing any of these (other than `cache_buckets` and
/// `memoize_samples`) changes the generated world.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct MapgenSettings {
    /// Fixed world seed. If unset, a random seed with a usable spawn point is chosen.
    pub seed: Option<i32>,
    pub cave_probability: f32,
    pub tree_probability: f32,
    pub lava_lake_probability: f32,
    pub decoration_probability: f32,
    /// Buckets per derived-field cache. Primes work best.
    pub cache_buckets: usize,
    pub memoize_samples: bool,
}

pub const FILENAME: &str = "mapgen.ron";

impl Default for MapgenSettings {
    fn default() -> Self {
        Self {
            seed: None,
            cave_probability: 0.012,
            tree_probability: 0.012,
            lava_lake_probability: 0.0015,
            decoration_probability: 0.01,
            cache_buckets: DEFAULT_BUCKETS,
            memoize_samples: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f32 },
    #[error("cache_buckets must be nonzero")]
    NoCacheBuckets,
}

impl MapgenSettings {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("cave_probability", self.cave_probability),
            ("tree_probability", self.tree_probability),
            ("lava_lake_probability", self.lava_lake_probability),
            ("decoration_probability", self.decoration_probability),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                SettingsError::OutOfRange { name, value }
            );
        }
        ensure!(self.cache_buckets > 0, SettingsError::NoCacheBuckets);
        Ok(())
    }
}

pub fn load(data_dir: &Path) -> Result<MapgenSettings> {
    let config_file = data_dir.join(FILENAME);
    log::info!("Loading mapgen settings from {}", config_file.display());
    if !config_file.exists() {
        log::info!("No mapgen settings found; using defaults");
        return Ok(Default::default());
    }
    let contents = std::fs::read_to_string(&config_file)
        .with_context(|| format!("Reading {}", config_file.display()))?;
    let config = ron::from_str::<MapgenSettings>(&contents)
        .with_context(|| format!("Parsing {}", config_file.display()))?;
    config.validate()?;
    log::info!("Loaded mapgen settings from {}", config_file.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("strata_settings_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = scratch_dir("missing");
        let _ = std::fs::remove_file(dir.join(FILENAME));
        assert_eq!(load(&dir).unwrap(), MapgenSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = scratch_dir("partial");
        std::fs::write(dir.join(FILENAME), "(seed: Some(-12), tree_probability: 0.05)").unwrap();
        let settings = load(&dir).unwrap();
        assert_eq!(settings.seed, Some(-12));
        assert_eq!(settings.tree_probability, 0.05);
        assert_eq!(settings.cave_probability, MapgenSettings::default().cave_probability);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_out_of_range_rejected() {
        let dir = scratch_dir("invalid");
        std::fs::write(dir.join(FILENAME), "(cave_probability: 1.5)").unwrap();
        let err = load(&dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::OutOfRange {
                name: "cave_probability",
                ..
            })
        ));
        std::fs::remove_dir_all(&dir).unwrap();

        let settings = MapgenSettings {
            cache_buckets: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_ron() {
        let settings = MapgenSettings {
            seed: Some(7),
            ..Default::default()
        };
        let text =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(ron::from_str::<MapgenSettings>(&text).unwrap(), settings);
    }
}
