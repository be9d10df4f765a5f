use thiserror::Error;

/// Contract violations rejected by the scheduler.
///
/// The scheduler performs no I/O, so every variant here points at a caller
/// bug or at stored state that broke its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrsError {
    #[error("score must be between 1 and 5, got {0}")]
    InvalidScore(u8),
    #[error("interval must be a finite, non-negative number of days, got {0}")]
    InvalidInterval(f64),
    #[error("eFactor must be finite and at least {min}, got {0}", min = crate::MIN_E_FACTOR)]
    InvalidEFactor(f64),
    #[error("lateness must be finite, got {0}")]
    InvalidLateness(f64),
    #[error("elapsed answer time must be finite and non-negative, got {0}")]
    InvalidElapsed(f64),
    #[error("mastery must be finite, got {0}")]
    InvalidMastery(f64),
    #[error("interval of {0} days does not fit in a timestamp")]
    DueDateOverflow(f64),
}
