//! Error type shared by the scheduling and review engines.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("review quality must be within 0..=5, got {0}")]
    InvalidQuality(i32),

    #[error("horizon must not be negative, got {0} days")]
    NegativeHorizon(i64),

    #[error("date {0} days out is outside the supported range")]
    DateOutOfRange(i64),

    #[error("invalid scheduler config: {0}")]
    InvalidConfig(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("unknown card: {0}")]
    UnknownCard(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
