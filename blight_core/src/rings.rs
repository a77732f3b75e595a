use blight_schema::{Coordinate, InputTables, Probabilities, ProbabilityChannel};

use crate::error::SpreadError;

/// One distance ring: relative neighbor offsets sharing a probability vector.
#[derive(Debug, Clone, PartialEq)]
pub struct RingEntry {
    pub offsets: Vec<Coordinate>,
    pub probabilities: Probabilities,
}

/// Rings paired with their per-channel probabilities, validated up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingTable {
    rings: Vec<RingEntry>,
}

impl RingTable {
    /// Pair every ring with `[sc, pf, hn]` at its index.
    ///
    /// A short SC list yields 0 for the missing rings. PF and HN must cover
    /// every ring.
    pub fn build(
        rings: &[Vec<Coordinate>],
        prob_sc: &[f64],
        prob_pf: &[f64],
        prob_hn: &[f64],
    ) -> Result<Self, SpreadError> {
        let rings = rings
            .iter()
            .enumerate()
            .map(|(ring, offsets)| {
                let sc = prob_sc.get(ring).copied().unwrap_or(0.0);
                let pf = required(prob_pf, ProbabilityChannel::Pf, ring)?;
                let hn = required(prob_hn, ProbabilityChannel::Hn, ring)?;
                Ok(RingEntry {
                    offsets: offsets.clone(),
                    probabilities: Probabilities::new(sc, pf, hn),
                })
            })
            .collect::<Result<Vec<_>, SpreadError>>()?;
        Ok(Self { rings })
    }

    pub fn from_tables(tables: &InputTables) -> Result<Self, SpreadError> {
        Self::build(
            &tables.rings,
            &tables.prob_sc,
            &tables.prob_pf,
            &tables.prob_hn,
        )
    }

    pub fn rings(&self) -> &[RingEntry] {
        &self.rings
    }

    pub fn get(&self, ring: usize) -> Option<&RingEntry> {
        self.rings.get(ring)
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

fn required(list: &[f64], channel: ProbabilityChannel, ring: usize) -> Result<f64, SpreadError> {
    list.get(ring)
        .copied()
        .ok_or(SpreadError::MissingProbability {
            channel,
            ring,
            len: list.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(count: usize) -> Vec<Vec<Coordinate>> {
        (0..count)
            .map(|i| vec![Coordinate::new(i as f64, 0.0)])
            .collect()
    }

    #[test]
    fn short_sc_list_defaults_to_zero() {
        let table = RingTable::build(&offsets(3), &[0.5], &[0.1, 0.2, 0.3], &[0.4, 0.5, 0.6])
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rings()[0].probabilities, Probabilities::new(0.5, 0.1, 0.4));
        assert_eq!(table.rings()[2].probabilities, Probabilities::new(0.0, 0.3, 0.6));
    }

    #[test]
    fn short_pf_list_is_fatal() {
        let err = RingTable::build(&offsets(2), &[], &[0.1], &[0.4, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            SpreadError::MissingProbability {
                channel: ProbabilityChannel::Pf,
                ring: 1,
                len: 1
            }
        ));
    }

    #[test]
    fn short_hn_list_is_fatal() {
        let err = RingTable::build(&offsets(1), &[], &[0.1], &[]).unwrap_err();
        assert!(matches!(
            err,
            SpreadError::MissingProbability {
                channel: ProbabilityChannel::Hn,
                ring: 0,
                len: 0
            }
        ));
    }

    #[test]
    fn extra_probabilities_are_ignored() {
        let table = RingTable::build(&offsets(1), &[0.1, 0.9], &[0.2, 0.9], &[0.3, 0.9]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().probabilities, Probabilities::new(0.1, 0.2, 0.3));
    }
}
