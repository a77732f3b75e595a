//! Single-consumer reduction of ring contributions into the result map.
//!
//! The aggregator is the only owner of result state. Each ring's
//! contributions are first merged into a partial map of their own, and
//! completed partials are folded into the final map strictly in ring order,
//! so floating-point sums come out bit-identical whatever order the workers
//! happened to run in.

use blight_schema::{Coordinate, CoordinateMap, Probabilities};
use crossbeam_channel::Receiver;
use tracing::debug;

use crate::error::SpreadError;
use crate::metrics::SpreadMetrics;
use crate::worker::{Contribution, ContributionKind, RingMessage, RingStats};

/// Net infection pressure per candidate tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadResult {
    entries: CoordinateMap<Probabilities>,
}

impl SpreadResult {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Coordinate, Probabilities)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<Probabilities> {
        self.entries.get(coordinate).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Probabilities)> {
        self.entries.iter()
    }

    /// Entries ordered by coordinate, for stable output.
    pub fn sorted_entries(&self) -> Vec<(Coordinate, Probabilities)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(c, p)| (*c, *p)).collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        entries
    }
}

/// Apply one contribution to `map`.
///
/// A fresh coordinate stores the signed vector (`v` or `-v`); an existing
/// entry gets `v` added or subtracted. Either way the net effect is `+v` for
/// gaining and `-v` for losing.
pub fn merge(
    map: &mut CoordinateMap<Probabilities>,
    coordinate: Coordinate,
    probabilities: Probabilities,
    kind: ContributionKind,
) {
    map.entry(coordinate)
        .and_modify(|stored| match kind {
            ContributionKind::Gaining => *stored += probabilities,
            ContributionKind::Losing => *stored -= probabilities,
        })
        .or_insert_with(|| kind.signed(probabilities));
}

#[derive(Debug)]
enum RingSlot {
    Open(CoordinateMap<Probabilities>),
    Completed(CoordinateMap<Probabilities>),
    Folded,
}

#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<RingSlot>,
    next_fold: usize,
    entries: CoordinateMap<Probabilities>,
    metrics: SpreadMetrics,
}

impl Aggregator {
    pub fn new(ring_count: usize) -> Self {
        Self {
            slots: (0..ring_count)
                .map(|_| RingSlot::Open(CoordinateMap::default()))
                .collect(),
            next_fold: 0,
            entries: CoordinateMap::default(),
            metrics: SpreadMetrics {
                rings: ring_count,
                ..SpreadMetrics::default()
            },
        }
    }

    pub fn apply(&mut self, contribution: Contribution) -> Result<(), SpreadError> {
        let rings = self.slots.len();
        match self.slots.get_mut(contribution.ring) {
            Some(RingSlot::Open(partial)) => {
                merge(
                    partial,
                    contribution.coordinate,
                    contribution.probabilities,
                    contribution.kind,
                );
                Ok(())
            }
            Some(_) => Err(SpreadError::LateContribution {
                ring: contribution.ring,
            }),
            None => Err(SpreadError::UnknownRing {
                ring: contribution.ring,
                rings,
            }),
        }
    }

    pub fn complete(&mut self, ring: usize, stats: RingStats) -> Result<(), SpreadError> {
        let rings = self.slots.len();
        let slot = self
            .slots
            .get_mut(ring)
            .ok_or(SpreadError::UnknownRing { ring, rings })?;
        let partial = match std::mem::replace(slot, RingSlot::Folded) {
            RingSlot::Open(partial) => partial,
            previous => {
                *slot = previous;
                return Err(SpreadError::DuplicateCompletion { ring });
            }
        };

        debug!(
            target: "blight::aggregator",
            ring,
            touched = partial.len(),
            gaining = stats.gaining,
            losing = stats.losing,
            "ring.completed"
        );
        *slot = RingSlot::Completed(partial);
        self.metrics.record_ring(&stats);
        self.fold_ready();
        Ok(())
    }

    fn fold_ready(&mut self) {
        while let Some(slot) = self.slots.get_mut(self.next_fold) {
            if !matches!(slot, RingSlot::Completed(_)) {
                break;
            }
            if let RingSlot::Completed(partial) = std::mem::replace(slot, RingSlot::Folded) {
                for (coordinate, net) in partial {
                    merge(&mut self.entries, coordinate, net, ContributionKind::Gaining);
                }
            }
            self.next_fold += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_fold == self.slots.len()
    }

    /// Consume messages until every ring has completed.
    pub fn run(
        mut self,
        receiver: &Receiver<RingMessage>,
    ) -> Result<(SpreadResult, SpreadMetrics), SpreadError> {
        let expected = self.slots.len();
        let mut completed = 0;
        while completed < expected {
            match receiver.recv() {
                Ok(RingMessage::Contribution(contribution)) => self.apply(contribution)?,
                Ok(RingMessage::Completed { ring, stats }) => {
                    self.complete(ring, stats)?;
                    completed += 1;
                }
                Err(_) => {
                    return Err(SpreadError::WorkersDisconnected {
                        completed,
                        expected,
                    })
                }
            }
        }
        Ok(self.finish())
    }

    /// Hand over the final map. Rings that never completed are not included.
    pub fn finish(mut self) -> (SpreadResult, SpreadMetrics) {
        self.metrics.result_entries = self.entries.len();
        (
            SpreadResult {
                entries: self.entries,
            },
            self.metrics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    const C: Coordinate = Coordinate::new(1.0, 0.0);

    fn contribution(
        ring: usize,
        probabilities: Probabilities,
        kind: ContributionKind,
    ) -> Contribution {
        Contribution {
            ring,
            coordinate: C,
            probabilities,
            kind,
        }
    }

    #[test]
    fn losing_on_fresh_coordinate_is_negated() {
        let mut map = CoordinateMap::default();
        merge(&mut map, C, Probabilities::new(0.1, 0.2, 0.3), ContributionKind::Losing);
        assert_eq!(map[&C], Probabilities::new(-0.1, -0.2, -0.3));
    }

    #[test]
    fn gaining_then_losing_cancels() {
        let v = Probabilities::new(0.1, 0.2, 0.3);
        let mut map = CoordinateMap::default();
        merge(&mut map, C, v, ContributionKind::Gaining);
        merge(&mut map, C, v, ContributionKind::Losing);
        assert_eq!(map[&C], Probabilities::ZERO);
    }

    #[test]
    fn losing_then_gaining_cancels() {
        let v = Probabilities::new(0.1, 0.2, 0.3);
        let mut map = CoordinateMap::default();
        merge(&mut map, C, v, ContributionKind::Losing);
        merge(&mut map, C, v, ContributionKind::Gaining);
        assert_eq!(map[&C], Probabilities::ZERO);
    }

    #[test]
    fn repeated_losing_keeps_subtracting() {
        let v = Probabilities::new(0.25, 0.5, 0.125);
        let mut map = CoordinateMap::default();
        merge(&mut map, C, v, ContributionKind::Losing);
        merge(&mut map, C, v, ContributionKind::Losing);
        assert_eq!(map[&C], Probabilities::new(-0.5, -1.0, -0.25));
    }

    #[test]
    fn folds_in_ring_order_regardless_of_completion_order() {
        let mut aggregator = Aggregator::new(2);
        aggregator
            .apply(contribution(1, Probabilities::new(0.5, 0.0, 0.0), ContributionKind::Losing))
            .unwrap();
        aggregator.complete(1, RingStats::default()).unwrap();
        assert!(!aggregator.is_complete());
        aggregator
            .apply(contribution(0, Probabilities::new(0.25, 0.0, 0.0), ContributionKind::Gaining))
            .unwrap();
        aggregator.complete(0, RingStats::default()).unwrap();
        assert!(aggregator.is_complete());

        let (result, metrics) = aggregator.finish();
        assert_eq!(result.get(&C), Some(Probabilities::new(-0.25, 0.0, 0.0)));
        assert_eq!(metrics.rings, 2);
        assert_eq!(metrics.result_entries, 1);
    }

    #[test]
    fn duplicate_completion_is_rejected() {
        let mut aggregator = Aggregator::new(2);
        aggregator.complete(0, RingStats::default()).unwrap();
        assert!(matches!(
            aggregator.complete(0, RingStats::default()),
            Err(SpreadError::DuplicateCompletion { ring: 0 })
        ));
        assert!(matches!(
            aggregator.apply(contribution(0, Probabilities::ZERO, ContributionKind::Gaining)),
            Err(SpreadError::LateContribution { ring: 0 })
        ));
    }

    #[test]
    fn unknown_ring_is_rejected() {
        let mut aggregator = Aggregator::new(1);
        assert!(matches!(
            aggregator.complete(3, RingStats::default()),
            Err(SpreadError::UnknownRing { ring: 3, rings: 1 })
        ));
    }

    #[test]
    fn disconnect_before_completion_fails() {
        let (sender, receiver) = unbounded();
        sender
            .send(RingMessage::Contribution(contribution(
                0,
                Probabilities::new(0.1, 0.0, 0.0),
                ContributionKind::Gaining,
            )))
            .unwrap();
        drop(sender);
        let err = Aggregator::new(1).run(&receiver).unwrap_err();
        assert!(matches!(
            err,
            SpreadError::WorkersDisconnected {
                completed: 0,
                expected: 1
            }
        ));
    }

    #[test]
    fn run_sums_metrics_from_completions() {
        let (sender, receiver) = unbounded();
        for ring in 0..2 {
            sender
                .send(RingMessage::Contribution(contribution(
                    ring,
                    Probabilities::new(0.5, 0.0, 0.0),
                    ContributionKind::Gaining,
                )))
                .unwrap();
            sender
                .send(RingMessage::Completed {
                    ring,
                    stats: RingStats {
                        gaining: 1,
                        losing: 0,
                        checked: 3,
                        rejected: 2,
                    },
                })
                .unwrap();
        }
        let (result, metrics) = Aggregator::new(2).run(&receiver).unwrap();
        assert_eq!(result.get(&C), Some(Probabilities::new(1.0, 0.0, 0.0)));
        assert_eq!(metrics.gaining_contributions, 2);
        assert_eq!(metrics.positions_checked, 6);
        assert_eq!(metrics.positions_rejected, 4);
    }
}
