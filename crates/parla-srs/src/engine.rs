//! Interval and ease-factor engine.
//!
//! Cards with a streak below [`GRADUATING_STREAK`] are in the learning phase
//! and walk a fixed ladder of short intervals without touching their ease.
//! Past that, intervals grow with an SM-2 style ease update. Reviews that
//! come in well ahead of the due date blend the "reviewed now" outcome with
//! the outcome of leaving the card alone, so studying ahead cannot inflate
//! intervals.

use crate::{CardSchedule, Evaluation, Fuzz, MIN_E_FACTOR, Score, SrsError};

/// Streak at which a card leaves the learning phase.
pub const GRADUATING_STREAK: u32 = 3;

/// Interval after any failed review: 30 minutes.
pub const RELEARN_INTERVAL: f64 = 30.0 / 1440.0;

/// Fuzz spread in the learning phase.
pub const LEARNING_FUZZ: f64 = 0.10;
/// Fuzz spread in the review phase.
pub const REVIEW_FUZZ: f64 = 0.05;

/// Ease lost on a failed review-phase card.
const LAPSE_E_FACTOR_PENALTY: f64 = 0.2;

/// Lateness below this counts as an early review.
const EARLY_THRESHOLD: f64 = -0.1;
/// Lateness at or above this earns a bonus on the ease update.
const LATE_THRESHOLD: f64 = 0.1;
/// Interval multiplier for an on-time "hard" (score 3) pass.
const HARD_INTERVAL_ADJUSTMENT: f64 = 0.8;

/// Compute the next streak, ease factor and interval for a card.
///
/// Pure apart from the injected `fuzz`; neither input is modified.
pub fn compute_schedule<F: Fuzz + ?Sized>(
    card: &CardSchedule,
    evaluation: &Evaluation,
    fuzz: &mut F,
) -> Result<CardSchedule, SrsError> {
    card.validate()?;
    // A graduated card always carries at least the one-day interval it left learning with.
    if !card.is_learning() && card.interval <= 0.0 {
        return Err(SrsError::InvalidInterval(card.interval));
    }
    if !evaluation.lateness.is_finite() {
        return Err(SrsError::InvalidLateness(evaluation.lateness));
    }

    let (mut next, spread) = if card.is_learning() {
        (learning_step(card, evaluation.score), LEARNING_FUZZ)
    } else {
        (review_step(card, evaluation), REVIEW_FUZZ)
    };

    next.interval *= 1.0 + fuzz.draw() * spread;

    tracing::trace!(
        streak = next.streak,
        e_factor = next.e_factor,
        interval = next.interval,
        "schedule computed"
    );

    Ok(next)
}

/// Fixed interval for a card that has just reached `streak` in learning.
///
/// * 1 → 30 minutes
/// * 2 → 12 hours
/// * 3 → 1 day
fn learning_interval(streak: u32) -> f64 {
    match streak {
        0 | 1 => RELEARN_INTERVAL,
        2 => 0.5,
        _ => 1.0,
    }
}

fn learning_step(card: &CardSchedule, score: Score) -> CardSchedule {
    if !score.is_pass() {
        return CardSchedule {
            streak: 0,
            e_factor: card.e_factor,
            interval: RELEARN_INTERVAL,
        };
    }

    let streak = card.streak + 1;
    CardSchedule {
        streak,
        e_factor: card.e_factor,
        interval: learning_interval(streak),
    }
}

fn review_step(card: &CardSchedule, evaluation: &Evaluation) -> CardSchedule {
    let score = evaluation.score;

    if !score.is_pass() {
        return CardSchedule {
            streak: 0,
            e_factor: (card.e_factor - LAPSE_E_FACTOR_PENALTY).max(MIN_E_FACTOR),
            interval: RELEARN_INTERVAL,
        };
    }

    if evaluation.lateness >= EARLY_THRESHOLD {
        on_time_step(card, score, evaluation.lateness)
    } else {
        early_step(card, score, evaluation.lateness)
    }
}

fn on_time_step(card: &CardSchedule, score: Score, lateness: f64) -> CardSchedule {
    let raw = score.as_f64();

    let (adjusted_score, interval_adjustment) = if lateness >= LATE_THRESHOLD {
        let lateness_factor = lateness.min(1.0);
        let score_factor = 1.0 + (raw - 3.0) / 4.0;
        (raw + lateness_factor * score_factor, 1.0)
    } else if score == Score::PASS {
        (raw, HARD_INTERVAL_ADJUSTMENT)
    } else {
        (raw, 1.0)
    };

    let e_factor = next_e_factor(card.e_factor, adjusted_score);

    CardSchedule {
        streak: card.streak + 1,
        e_factor,
        interval: grown_interval(card, interval_adjustment, e_factor),
    }
}

/// Blend between treating the review as on time and ignoring it.
///
/// `earliness` runs from 0 (reviewed right after the last review) towards
/// 0.9 (almost due). The closer to due, the more weight goes to the future
/// projection, whose score regresses towards a neutral 3.
fn early_step(card: &CardSchedule, score: Score, lateness: f64) -> CardSchedule {
    let earliness = 1.0 + lateness;
    let future_weight = (earliness.powi(2).exp() - 1.0).min(1.0);
    let current_weight = 1.0 - future_weight;

    let predicted_score = current_weight * score.as_f64() + future_weight * 3.0;
    let future_e_factor = next_e_factor(card.e_factor, predicted_score);
    let future_interval = grown_interval(card, 1.0, future_e_factor);

    // The blend of two values at the floor can round just below it.
    let e_factor = (card.e_factor * current_weight + future_e_factor * future_weight)
        .max(MIN_E_FACTOR);
    let interval = (card.interval * current_weight + future_interval * future_weight)
        .max(card.interval.min(future_interval));

    CardSchedule {
        streak: card.streak + 1,
        e_factor,
        interval,
    }
}

/// SM-2 ease update, generalized to fractional scores.
fn next_e_factor(e_factor: f64, score: f64) -> f64 {
    let miss = 5.0 - score;
    (e_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_E_FACTOR)
}

/// Classic SM-2 interval growth keyed on the streak before this review.
fn grown_interval(card: &CardSchedule, adjustment: f64, e_factor: f64) -> f64 {
    match card.streak {
        0 => 1.0,
        1 => 6.0,
        _ => (card.interval * adjustment * e_factor).ceil(),
    }
}
