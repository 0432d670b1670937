//! Hex geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Axial hex coordinates (flat-top)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Cube coordinates, only used for distance math
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cube {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Cube {
    pub fn distance_to(&self, other: Cube) -> u32 {
        let d = (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs();
        u32::try_from(d / 2).unwrap_or(u32::MAX)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=SE, 1=NE, 2=N, 3=NW, 4=SW, 5=S
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),   // SE
    (1, -1),  // NE
    (0, -1),  // N
    (-1, 0),  // NW
    (-1, 1),  // SW
    (0, 1),   // S
];

impl Hex {
    /// Sentinel for "no cell"
    pub const INVALID: Hex = Hex { q: i32::MIN, r: i32::MIN };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn is_invalid(&self) -> bool {
        *self == Self::INVALID
    }

    pub fn to_cube(self) -> Cube {
        let x = self.q as i64;
        let z = self.r as i64;
        Cube { x, y: -x - z, z }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> u32 {
        self.to_cube().distance_to(other.to_cube())
    }

    /// Get neighbor in direction (0-5). Saturates at the coordinate limits,
    /// so the sentinel and far-off cells never overflow.
    pub fn neighbor(&self, direction: usize) -> Hex {
        self.step(direction, 1)
    }

    /// All six neighbors, unfiltered, in direction order
    pub fn neighbors(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..6).map(move |d| self.neighbor(d))
    }

    /// Step `steps` cells along a direction
    pub fn step(&self, direction: usize, steps: i32) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(
            self.q.saturating_add(dq.saturating_mul(steps)),
            self.r.saturating_add(dr.saturating_mul(steps)),
        )
    }

    /// Column/row of this hex in an even-q rectangular layout
    pub fn to_offset(&self) -> (i32, i32) {
        let shift = (self.q as i64 + (self.q & 1) as i64) / 2;
        (self.q, clamp_i32(self.r as i64 + shift))
    }

    pub fn from_offset(col: i32, row: i32) -> Hex {
        let shift = (col as i64 + (col & 1) as i64) / 2;
        Hex::new(col, clamp_i32(row as i64 - shift))
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Snap an axial delta to the nearest of the six directions.
///
/// Nearest means the smallest |dq - DIR.q| + |dr - DIR.r|; the first
/// direction in table order wins ties.
pub fn nearest_direction(delta: (i32, i32)) -> usize {
    let (dq, dr) = delta;
    let mut best = 0;
    let mut best_dist = i64::MAX;
    for (i, &(q, r)) in DIRECTIONS.iter().enumerate() {
        let dist = (dq as i64 - q as i64).abs() + (dr as i64 - r as i64).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
