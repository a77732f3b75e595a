//! Ring workers: one per ring, streaming contributions to the aggregator.

use blight_schema::{Coordinate, Probabilities};
use crossbeam_channel::{SendError, Sender};

use crate::candidates::CandidateIndex;
use crate::rings::RingEntry;

/// Direction of infection pressure a contribution carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    /// Radiated from a newly infected tree.
    Gaining,
    /// Radiated from a tree losing its infection.
    Losing,
}

impl ContributionKind {
    /// The net effect this kind has on a stored vector.
    pub fn signed(self, probabilities: Probabilities) -> Probabilities {
        match self {
            Self::Gaining => probabilities,
            Self::Losing => -probabilities,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub ring: usize,
    pub coordinate: Coordinate,
    pub probabilities: Probabilities,
    pub kind: ContributionKind,
}

/// Counters a worker accumulates for its ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingStats {
    pub gaining: u64,
    pub losing: u64,
    pub checked: u64,
    pub rejected: u64,
}

impl RingStats {
    fn record(&mut self, kind: ContributionKind) {
        match kind {
            ContributionKind::Gaining => self.gaining += 1,
            ContributionKind::Losing => self.losing += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RingMessage {
    Contribution(Contribution),
    Completed { ring: usize, stats: RingStats },
}

/// Read-only tables every worker shares.
#[derive(Debug, Clone, Copy)]
pub struct WorkerContext<'a> {
    pub candidates: &'a CandidateIndex,
    pub newly_infected: &'a [Coordinate],
    pub losing_infection: &'a [Coordinate],
    pub world_width: f64,
}

/// Emit every contribution of `ring`, then its completion signal.
///
/// For each neighbor offset the newly infected sources are walked before the
/// losing ones. Stops early only if the aggregator has hung up.
pub fn run_ring(
    ring_index: usize,
    ring: &RingEntry,
    ctx: &WorkerContext<'_>,
    sender: &Sender<RingMessage>,
) -> Result<RingStats, SendError<RingMessage>> {
    let mut stats = RingStats::default();
    let sources = [
        (ctx.newly_infected, ContributionKind::Gaining),
        (ctx.losing_infection, ContributionKind::Losing),
    ];

    for neighbor in &ring.offsets {
        for (list, kind) in sources {
            for source in list {
                let coordinate = (*neighbor + *source).wrap(ctx.world_width);
                stats.checked += 1;
                if !ctx.candidates.contains(&coordinate) {
                    stats.rejected += 1;
                    continue;
                }
                stats.record(kind);
                sender.send(RingMessage::Contribution(Contribution {
                    ring: ring_index,
                    coordinate,
                    probabilities: ring.probabilities,
                    kind,
                }))?;
            }
        }
    }

    sender.send(RingMessage::Completed {
        ring: ring_index,
        stats,
    })?;
    Ok(stats)
}
