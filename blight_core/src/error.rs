use blight_schema::ProbabilityChannel;
use thiserror::Error;

/// Fatal conditions of a spread run. No partial result accompanies any of them.
#[derive(Debug, Error)]
pub enum SpreadError {
    #[error("world width must be a positive finite number, got {0}")]
    InvalidWorldWidth(f64),
    #[error("{channel} probability list has {len} entries but ring {ring} requires one")]
    MissingProbability {
        channel: ProbabilityChannel,
        ring: usize,
        len: usize,
    },
    #[error("failed to build ring worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("ring workers disconnected after {completed} of {expected} rings completed")]
    WorkersDisconnected { completed: usize, expected: usize },
    #[error("ring {ring} reported completion more than once")]
    DuplicateCompletion { ring: usize },
    #[error("message for ring {ring} outside a table of {rings} rings")]
    UnknownRing { ring: usize, rings: usize },
    #[error("contribution for ring {ring} arrived after the ring completed")]
    LateContribution { ring: usize },
}
