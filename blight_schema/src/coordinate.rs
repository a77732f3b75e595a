use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A world position or a relative offset, in tree units.
///
/// Rows are laid out with a half-tree offset, so `y` may legitimately sit at
/// `-0.5`. Equality is exact IEEE value equality (`0.0 == -0.0`, NaN never
/// matches) and hashing agrees with it, which lets coordinates produced by
/// identical arithmetic act as map keys.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Fold the coordinate back onto a toroidal world of `world_width`.
    ///
    /// Each axis is corrected at most once: `x` against `[0, W - 1]` and `y`
    /// against `[-0.5, W - 1]`. A value shifted up off the low edge is not
    /// re-checked against the high edge, so `-0.6` lands on `W - 0.6`.
    /// Values more than one width out of range come back still out of range.
    pub fn wrap(self, world_width: f64) -> Self {
        Self {
            x: wrap_axis(self.x, 0.0, world_width),
            y: wrap_axis(self.y, -0.5, world_width),
        }
    }

    /// Total order over both axes, `x` first. Used for stable output only.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

#[inline]
fn wrap_axis(value: f64, low: f64, world_width: f64) -> f64 {
    if value < low {
        value + world_width
    } else if value > world_width - 1.0 {
        value - world_width
    } else {
        value
    }
}

#[inline]
fn key_bits(value: f64) -> u64 {
    // +0.0 and -0.0 compare equal and must hash alike.
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(key_bits(self.x));
        state.write_u64(key_bits(self.y));
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.x, coordinate.y]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
