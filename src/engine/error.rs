use thiserror::Error;

use crate::engine::model::CustomTimings;

/// Failures returned by engine commands. A failed command never changes
/// engine state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("the selected exercise has no phases to run")]
    NoPhasesDefined,
    #[error("unknown exercise id '{0}'")]
    UnknownExerciseId(String),
    #[error("invalid custom timings ({0})")]
    InvalidTimings(CustomTimings),
    #[error("operation requires the exercise to be stopped")]
    ExerciseRunning,
}

pub type EngineResult<T> = Result<T, EngineError>;
