//! Infection spread engine for the blight forest model.
//!
//! Resolves one step of infection pressure on a toroidal forest: every ring of
//! neighbor offsets is processed by its own worker, and a single aggregator
//! merges the resulting contributions into one probability vector per
//! candidate tree. Call [`run_spread`] with already-parsed tables, or use the
//! [`loader`] to read them from disk first.

pub mod aggregator;
mod candidates;
pub mod config;
mod engine;
mod error;
pub mod export;
pub mod hashing;
pub mod loader;
pub mod metrics;
mod rings;
pub mod worker;

pub use aggregator::{merge, Aggregator, SpreadResult};
pub use candidates::CandidateIndex;
pub use config::{load_engine_config_from_env, EngineConfig, EngineConfigError};
pub use engine::{run_spread, SpreadOutcome, SpreadParams};
pub use error::SpreadError;
pub use export::{encode_result, export_records, write_result, ExportError, OutputFormat};
pub use hashing::result_digest;
pub use loader::{default_data_dir, load_input_tables, parse_world_width, LoadError};
pub use metrics::SpreadMetrics;
pub use rings::{RingEntry, RingTable};
pub use worker::{Contribution, ContributionKind, RingMessage, RingStats, WorkerContext};

pub use blight_schema::{Coordinate, InputTables, Probabilities, ProbabilityChannel};
