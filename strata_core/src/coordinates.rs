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

use std::fmt::{Debug, Display};
use std::str::FromStr;

use anyhow::{bail, Context};

/// A 3D coordinate in the world.
///
/// Note that the impls of PartialOrd and Ord are meant for tiebreaking (e.g. for sorted data
/// structures) and don't have a lot of semantic meaning on their own.
#[derive(PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct BlockCoordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Debug for BlockCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{}, {}, {}]", self.x, self.y, self.z))
    }
}
impl BlockCoordinate {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn try_delta(&self, x: i32, y: i32, z: i32) -> Option<BlockCoordinate> {
        let x = self.x.checked_add(x)?;
        let y = self.y.checked_add(y)?;
        let z = self.z.checked_add(z)?;

        Some(BlockCoordinate { x, y, z })
    }

    /// The coordinate directly below this one. Wraps at i32::MIN, which is far outside the
    /// world anyway.
    #[inline]
    pub const fn below(&self) -> BlockCoordinate {
        BlockCoordinate {
            x: self.x,
            y: self.y.wrapping_sub(1),
            z: self.z,
        }
    }

    /// The tile containing this coordinate, for a tile that spans `edge` blocks along each axis.
    #[inline]
    pub const fn tile(&self, edge: i32) -> TileCoordinate {
        TileCoordinate {
            x: self.x.div_euclid(edge),
            y: self.y.div_euclid(edge),
            z: self.z.div_euclid(edge),
        }
    }
}
impl Display for BlockCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}
impl FromStr for BlockCoordinate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let pieces: Vec<_> = s.split(',').map(str::trim).collect();
        if pieces.len() != 3 {
            bail!("Wrong number of components in {s:?}");
        };
        Ok(BlockCoordinate::new(
            pieces[0].parse().context("bad x component")?,
            pieces[1].parse().context("bad y component")?,
            pieces[2].parse().context("bad z component")?,
        ))
    }
}

/// Index of an axis-aligned tile of blocks. The edge length is not stored; callers pair a
/// TileCoordinate with the edge length of the field that produced it.
///
/// For 2D (column) tiles, y is simply left at zero.
#[derive(PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}
impl TileCoordinate {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The column tile (y ignored) containing block column (x, z).
    #[inline]
    pub const fn column(x: i32, z: i32, edge: i32) -> Self {
        Self {
            x: x.div_euclid(edge),
            y: 0,
            z: z.div_euclid(edge),
        }
    }

    /// The lowest-coordinate block of this tile.
    #[inline]
    pub const fn origin(&self, edge: i32) -> BlockCoordinate {
        BlockCoordinate {
            x: self.x.wrapping_mul(edge),
            y: self.y.wrapping_mul(edge),
            z: self.z.wrapping_mul(edge),
        }
    }
}
impl Debug for TileCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("tile[{}, {}, {}]", self.x, self.y, self.z))
    }
}
