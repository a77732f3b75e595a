use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// The three independent contagion channels carried by every ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbabilityChannel {
    Sc,
    Pf,
    Hn,
}

impl ProbabilityChannel {
    pub fn index(self) -> usize {
        match self {
            Self::Sc => 0,
            Self::Pf => 1,
            Self::Hn => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sc => "SC",
            Self::Pf => "PF",
            Self::Hn => "HN",
        }
    }
}

impl fmt::Display for ProbabilityChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-channel probability vector, slots ordered SC, PF, HN.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probabilities(pub [f64; 3]);

impl Probabilities {
    pub const ZERO: Self = Self([0.0; 3]);

    pub const fn new(sc: f64, pf: f64, hn: f64) -> Self {
        Self([sc, pf, hn])
    }

    pub fn channel(&self, channel: ProbabilityChannel) -> f64 {
        self.0[channel.index()]
    }

    pub fn sc(&self) -> f64 {
        self.0[0]
    }

    pub fn pf(&self) -> f64 {
        self.0[1]
    }

    pub fn hn(&self) -> f64 {
        self.0[2]
    }

    pub fn to_bits(self) -> [u64; 3] {
        self.0.map(f64::to_bits)
    }
}

impl Add for Probabilities {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl AddAssign for Probabilities {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Probabilities {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self([
            self.0[0] - rhs.0[0],
            self.0[1] - rhs.0[1],
            self.0[2] - rhs.0[2],
        ])
    }
}

impl SubAssign for Probabilities {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Probabilities {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.map(|value| -value))
    }
}

impl From<[f64; 3]> for Probabilities {
    fn from(values: [f64; 3]) -> Self {
        Self(values)
    }
}

impl fmt::Debug for Probabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SC {:?}, PF {:?}, HN {:?}]",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

impl fmt::Display for Probabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.6}, {:.6}, {:.6}]", self.0[0], self.0[1], self.0[2])
    }
}
