use thiserror::Error;

/* Configuration problems detected when a training task starts. Programming
 * errors (size mismatches, uninitialized networks) panic instead. */
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    #[error("no network set on the trainer")]
    MissingNetwork,
    #[error("no training source set on the trainer")]
    MissingTrainingSource,
}
