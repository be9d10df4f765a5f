//! SRS (Spaced Repetition System) library for Parla
//!
//! This crate provides the review scheduler used to decide when a flashcard
//! comes back and how well the learner is shown to know it:
//!
//! * [`compute_schedule`]: streak, ease factor and interval after a review
//! * [`resolve_due_date`]: the absolute due date for an interval
//! * [`update_mastery`]: the 0–100 mastery percentage shown to users
//! * [`Scheduler`]: all three applied to a stored [`CardState`]
//!
//! Nothing here performs I/O. Randomness ([`Fuzz`]) and time ([`Clock`]) are
//! injected so results can be reproduced in tests.

mod card;
mod due;
mod engine;
mod error;
mod fuzz;
mod mastery;
mod review;
mod scoring;

pub use card::{CardSchedule, CardState, Evaluation, MasteryState, ReviewOutcome, Score};
pub use due::{Clock, FixedClock, LatenessUnit, SystemClock, compute_lateness, resolve_due_date};
pub use engine::{
    GRADUATING_STREAK, LEARNING_FUZZ, RELEARN_INTERVAL, REVIEW_FUZZ, compute_schedule,
};
pub use error::SrsError;
pub use fuzz::{FixedFuzz, Fuzz, RandomFuzz};
pub use mastery::{MAX_MASTERY, update_mastery};
pub use review::Scheduler;
pub use scoring::Rating;

/// Lowest ease factor a card can reach.
pub const MIN_E_FACTOR: f64 = 1.3;

/// Ease factor of a card that has never been reviewed.
pub const DEFAULT_E_FACTOR: f64 = 2.5;
