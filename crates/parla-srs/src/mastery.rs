//! Mastery estimator: the 0–100 "how well do I know this card" percentage.
//!
//! Mastery is tracked separately from the ease factor and interval. Passing
//! reviews move it a fraction of the way towards 100, failing reviews scale
//! it down, and the very first review sets it from a fixed table.

use crate::{MasteryState, Score};

/// Upper bound of the mastery percentage.
pub const MAX_MASTERY: f64 = 100.0;

/// Mastery assigned on a card's first review, indexed by `score - 1`.
const FIRST_REVIEW_MASTERY: [f64; 5] = [5.0, 20.0, 50.0, 65.0, 80.0];

/// Streak at or below which a card counts as recovering from a lapse.
const RECOVERY_STREAK: u32 = 3;

/// Apply one review to the mastery state.
///
/// `streak` is the card's streak as it was *before* this review: the
/// recovery bonus and the failure drop both key on the state the learner
/// walked in with.
pub fn update_mastery(state: &MasteryState, streak: u32, score: Score) -> MasteryState {
    let total_reviews = state.total_reviews.saturating_add(1);

    let mastery = if total_reviews == 1 {
        FIRST_REVIEW_MASTERY[usize::from(score.get() - 1)]
    } else if score.is_pass() {
        let fraction = pass_fraction(state.mastery, streak, total_reviews, score);
        state.mastery + fraction * (MAX_MASTERY - state.mastery)
    } else {
        state.mastery * fail_drop(streak, score)
    };

    let mastery = if mastery.is_nan() {
        0.0
    } else {
        mastery.clamp(0.0, MAX_MASTERY)
    };

    tracing::trace!(
        before = state.mastery,
        after = mastery,
        total_reviews,
        "mastery updated"
    );

    MasteryState {
        mastery,
        total_reviews,
    }
}

/// Fraction of the remaining distance to 100 covered by a passing review.
fn pass_fraction(mastery: f64, streak: u32, total_reviews: u32, score: Score) -> f64 {
    // Recovering after a lapse on a card with some history.
    let bonus = if streak <= RECOVERY_STREAK && total_reviews > 5 {
        0.3
    } else {
        0.0
    };
    // Long-running streaks would otherwise race to 100.
    let balance = if streak >= 30 && total_reviews > 10 {
        -0.15
    } else {
        0.0
    };

    let mut base = match score.get() {
        3 => 0.2,
        4 => 0.3,
        _ => 0.4,
    } + bonus
        + balance;

    // A "hard" on a well-known card erodes mastery instead of growing it.
    // Mastery of exactly 90 falls in the first band. A steeper drop for
    // mastery >= 95 was never reachable behind the score == 3 check and is
    // not applied.
    if streak >= 5 && score == Score::PASS {
        if (80.0..=90.0).contains(&mastery) {
            base = -0.1;
        } else if (90.0..=MAX_MASTERY).contains(&mastery) {
            base = -1.5;
        }
    }

    base / 2.5
}

/// Multiplier applied to mastery on a failing review.
fn fail_drop(streak: u32, score: Score) -> f64 {
    let (hard, fail) = if streak <= RECOVERY_STREAK {
        (0.96, 0.92)
    } else {
        (0.75, 0.65)
    };

    if score.get() == 2 { hard } else { fail }
}
