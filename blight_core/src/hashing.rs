//! Stable fingerprints of spread results, for comparing runs.

use blight_schema::{Coordinate, Probabilities};

use crate::aggregator::SpreadResult;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Running FNV-1a digest over the exact bit patterns of result values.
///
/// Unlike `DefaultHasher` the seed is fixed, so equal results digest alike in
/// every process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultDigest {
    state: u64,
}

impl Default for ResultDigest {
    fn default() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl ResultDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |state, &byte| {
            (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        });
    }

    pub fn push_u64(&mut self, value: u64) {
        self.push_bytes(&value.to_le_bytes());
    }

    /// Bit-exact, so `0.0` and `-0.0` digest differently.
    pub fn push_f64(&mut self, value: f64) {
        self.push_u64(value.to_bits());
    }

    pub fn push_entry(&mut self, coordinate: Coordinate, probabilities: Probabilities) {
        self.push_f64(coordinate.x);
        self.push_f64(coordinate.y);
        for bits in probabilities.to_bits() {
            self.push_u64(bits);
        }
    }

    pub fn value(&self) -> u64 {
        self.state
    }
}

/// Order-independent fingerprint of a result set, sensitive to every bit of
/// every coordinate and probability.
pub fn result_digest(result: &SpreadResult) -> u64 {
    let mut digest = ResultDigest::new();
    digest.push_u64(result.len() as u64);
    for (coordinate, probabilities) in result.sorted_entries() {
        digest.push_entry(coordinate, probabilities);
    }
    digest.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_1a_reference_vector() {
        let mut digest = ResultDigest::new();
        digest.push_bytes(b"a");
        assert_eq!(digest.value(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn empty_result_digests_its_length_only() {
        let mut digest = ResultDigest::new();
        digest.push_u64(0);
        assert_eq!(result_digest(&SpreadResult::default()), digest.value());
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(3.0, -0.5);
        let p = Probabilities::new(0.1, 0.2, 0.3);
        let q = Probabilities::new(-0.5, 0.0, 0.25);

        let first = SpreadResult::from_entries([(a, p), (b, q)]);
        let second = SpreadResult::from_entries([(b, q), (a, p)]);
        assert_eq!(result_digest(&first), result_digest(&second));

        let changed = SpreadResult::from_entries([(a, p), (b, -q)]);
        assert_ne!(result_digest(&first), result_digest(&changed));
    }
}
