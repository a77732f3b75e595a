//! Shared helpers for the end-to-end tests under `tests/`.

use std::path::PathBuf;

use blight_core::{merge, ContributionKind, InputTables, RingTable, SpreadError};
use blight_schema::{CoordinateMap, CoordinateSet, Probabilities};

pub fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Straight sequential walk over rings, neighbors and sources into one map.
///
/// Sums may differ from the engine in the last bits since the engine folds
/// per-ring partials.
pub fn reference_spread(
    tables: &InputTables,
    world_width: f64,
) -> Result<CoordinateMap<Probabilities>, SpreadError> {
    let rings = RingTable::from_tables(tables)?;
    let candidates: CoordinateSet = tables.candidates.iter().copied().collect();
    let mut map = CoordinateMap::default();

    for ring in rings.rings() {
        for neighbor in &ring.offsets {
            let sources = tables
                .newly_infected
                .iter()
                .map(|source| (source, ContributionKind::Gaining))
                .chain(
                    tables
                        .losing_infection
                        .iter()
                        .map(|source| (source, ContributionKind::Losing)),
                );
            for (source, kind) in sources {
                let absolute = (*neighbor + *source).wrap(world_width);
                if candidates.contains(&absolute) {
                    merge(&mut map, absolute, ring.probabilities, kind);
                }
            }
        }
    }
    Ok(map)
}
