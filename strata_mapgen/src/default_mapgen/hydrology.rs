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

use std::sync::Arc;

use strata_core::constants::world::WATER_HEIGHT;

use super::rock::RockHeightField;

/// How far (horizontally) water spreads from a below-sea-level column, and how far below a
/// neighbor's rock surface it can still soak in.
pub(crate) const FLOOD_RADIUS: i32 = 3;

/// Decides which voxels at or below the water line are flooded.
pub(crate) struct HydrologyField {
    rock: Arc<RockHeightField>,
}
impl HydrologyField {
    pub(crate) fn new(rock: Arc<RockHeightField>) -> HydrologyField {
        HydrologyField { rock }
    }

    pub(crate) fn is_submerged(&self, x: i32, y: i32, z: i32) -> bool {
        if y > WATER_HEIGHT {
            return false;
        }
        for dx in -FLOOD_RADIUS..=FLOOD_RADIUS {
            for dz in -FLOOD_RADIUS..=FLOOD_RADIUS {
                let neighbor = self.rock.height(x.wrapping_add(dx), z.wrapping_add(dz));
                if neighbor < WATER_HEIGHT && y > neighbor - FLOOD_RADIUS {
                    return true;
                }
            }
        }
        false
    }
}
