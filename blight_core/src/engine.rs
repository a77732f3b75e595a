use std::panic;
use std::thread;

use blight_schema::InputTables;
use crossbeam_channel::bounded;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregator::{Aggregator, SpreadResult};
use crate::candidates::CandidateIndex;
use crate::config::EngineConfig;
use crate::error::SpreadError;
use crate::hashing::result_digest;
use crate::metrics::SpreadMetrics;
use crate::rings::RingTable;
use crate::worker::{run_ring, WorkerContext};

/// Per-run parameters of a spread step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadParams {
    world_width: f64,
}

impl SpreadParams {
    pub fn new(world_width: f64) -> Result<Self, SpreadError> {
        if world_width.is_finite() && world_width > 0.0 {
            Ok(Self { world_width })
        } else {
            Err(SpreadError::InvalidWorldWidth(world_width))
        }
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadOutcome {
    pub result: SpreadResult,
    pub metrics: SpreadMetrics,
}

/// Compute the net infection pressure on every candidate tree.
///
/// Tables are validated before any worker starts. Rings run as parallel tasks
/// on a rayon pool while a scoped thread aggregates their contributions.
pub fn run_spread(
    tables: &InputTables,
    params: &SpreadParams,
    config: &EngineConfig,
) -> Result<SpreadOutcome, SpreadError> {
    let rings = RingTable::from_tables(tables)?;
    let candidates = CandidateIndex::from_coordinates(&tables.candidates);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads.unwrap_or(0))
        .thread_name(|index| format!("blight-ring-{index}"))
        .build()?;

    info!(
        target: "blight::engine",
        rings = rings.len(),
        candidates = candidates.len(),
        newly_infected = tables.newly_infected.len(),
        losing_infection = tables.losing_infection.len(),
        world_width = params.world_width(),
        workers = pool.current_num_threads(),
        "spread.started"
    );

    let ctx = WorkerContext {
        candidates: &candidates,
        newly_infected: &tables.newly_infected,
        losing_infection: &tables.losing_infection,
        world_width: params.world_width(),
    };
    let (sender, receiver) = bounded(config.channel_capacity.max(1));
    let aggregator = Aggregator::new(rings.len());

    let aggregated = thread::scope(|scope| {
        let handle = scope.spawn(move || aggregator.run(&receiver));

        pool.install(|| {
            rings
                .rings()
                .par_iter()
                .enumerate()
                .for_each_with(sender, |sender, (index, ring)| {
                    if run_ring(index, ring, &ctx, sender).is_err() {
                        debug!(
                            target: "blight::engine",
                            ring = index,
                            "ring.abandoned=aggregator_closed"
                        );
                    }
                });
        });

        handle
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload))
    });
    let (result, metrics) = aggregated?;

    info!(
        target: "blight::engine",
        entries = metrics.result_entries,
        gaining = metrics.gaining_contributions,
        losing = metrics.losing_contributions,
        checked = metrics.positions_checked,
        rejected = metrics.positions_rejected,
        digest = result_digest(&result),
        "spread.completed"
    );

    Ok(SpreadOutcome { result, metrics })
}
