//! Scheduling state carried by a flashcard and the evaluation applied to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_E_FACTOR, MIN_E_FACTOR, SrsError};

/// Numeric review score in `1..=5`.
///
/// Scores below 3 are failing reviews. The value is produced by the caller,
/// usually through [`Rating::score`](crate::Rating::score), and is never
/// clamped: anything outside the range is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest passing score.
    pub const PASS: Self = Self(3);

    /// Build a score, rejecting values outside `1..=5`.
    pub const fn new(value: u8) -> Result<Self, SrsError> {
        match value {
            1..=5 => Ok(Self(value)),
            other => Err(SrsError::InvalidScore(other)),
        }
    }

    /// Raw score value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this score counts as a successful recall.
    pub const fn is_pass(self) -> bool {
        self.0 >= Self::PASS.0
    }

    pub(crate) fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<u8> for Score {
    type Error = SrsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single review event. Not persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: Score,
    /// Signed distance from the due date. Negative means the card was
    /// reviewed early. See [`LatenessUnit`](crate::LatenessUnit) for units.
    pub lateness: f64,
}

impl Evaluation {
    pub fn new(score: Score, lateness: f64) -> Result<Self, SrsError> {
        if !lateness.is_finite() {
            return Err(SrsError::InvalidLateness(lateness));
        }
        Ok(Self { score, lateness })
    }
}

/// The part of a card's state read and written by the interval engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardSchedule {
    /// Consecutive passing reviews since the last failure.
    pub streak: u32,
    /// Ease factor, never below [`MIN_E_FACTOR`].
    pub e_factor: f64,
    /// Days until the card is due, fractional below one day.
    pub interval: f64,
}

impl CardSchedule {
    /// Scheduling state of a card that has never been reviewed.
    pub const fn new_card() -> Self {
        Self {
            streak: 0,
            e_factor: DEFAULT_E_FACTOR,
            interval: 0.0,
        }
    }

    /// Reject stored state that could not have been produced by the engine.
    pub fn validate(&self) -> Result<(), SrsError> {
        if !self.interval.is_finite() || self.interval < 0.0 {
            return Err(SrsError::InvalidInterval(self.interval));
        }
        if !self.e_factor.is_finite() || self.e_factor < MIN_E_FACTOR {
            return Err(SrsError::InvalidEFactor(self.e_factor));
        }
        Ok(())
    }

    pub(crate) const fn is_learning(&self) -> bool {
        self.streak < crate::engine::GRADUATING_STREAK
    }
}

impl Default for CardSchedule {
    fn default() -> Self {
        Self::new_card()
    }
}

/// The part of a card's state owned by the mastery estimator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MasteryState {
    /// Display percentage in `[0, 100]`.
    pub mastery: f64,
    /// Evaluations applied so far. Never decremented.
    pub total_reviews: u32,
}

/// Everything persisted for a card's scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CardState {
    #[serde(flatten)]
    pub schedule: CardSchedule,
    #[serde(flatten)]
    pub mastery: MasteryState,
    /// `None` until the first review.
    pub due_date: Option<DateTime<Utc>>,
}

impl CardState {
    /// Defaults applied when a flashcard is created.
    pub const fn new_card() -> Self {
        Self {
            schedule: CardSchedule::new_card(),
            mastery: MasteryState {
                mastery: 0.0,
                total_reviews: 0,
            },
            due_date: None,
        }
    }
}

/// Fields written back to the card record after one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub streak: u32,
    pub e_factor: f64,
    pub interval: f64,
    pub due_date: DateTime<Utc>,
    pub mastery: f64,
    pub total_reviews: u32,
}

impl ReviewOutcome {
    /// View the outcome as the state the next review will start from.
    pub const fn into_state(self) -> CardState {
        CardState {
            schedule: CardSchedule {
                streak: self.streak,
                e_factor: self.e_factor,
                interval: self.interval,
            },
            mastery: MasteryState {
                mastery: self.mastery,
                total_reviews: self.total_reviews,
            },
            due_date: Some(self.due_date),
        }
    }
}
