//! One review, end to end: engine, due date and mastery.

use crate::{
    CardState, Clock, Evaluation, Fuzz, LatenessUnit, RandomFuzz, Rating, ReviewOutcome,
    SrsError, SystemClock, compute_lateness, compute_schedule, resolve_due_date, update_mastery,
};

/// Applies evaluations to card state with injected randomness and time.
///
/// A `Scheduler` holds no per-card state. Callers must still make sure a
/// given card is reviewed by one evaluation at a time, for example by
/// locking its row while the outcome is computed and stored.
#[derive(Debug, Clone)]
pub struct Scheduler<F = RandomFuzz, C = SystemClock> {
    fuzz: F,
    clock: C,
    lateness_unit: LatenessUnit,
}

impl Scheduler {
    /// Scheduler using thread-local randomness and the wall clock.
    pub fn new() -> Self {
        Self::with_parts(RandomFuzz::default(), SystemClock)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fuzz, C: Clock> Scheduler<F, C> {
    pub fn with_parts(fuzz: F, clock: C) -> Self {
        Self {
            fuzz,
            clock,
            lateness_unit: LatenessUnit::Hours,
        }
    }

    #[must_use]
    pub fn lateness_unit(mut self, unit: LatenessUnit) -> Self {
        self.lateness_unit = unit;
        self
    }

    /// Apply `evaluation` to `card`. `None` means the card has never been reviewed.
    pub fn review(
        &mut self,
        card: Option<&CardState>,
        evaluation: &Evaluation,
    ) -> Result<ReviewOutcome, SrsError> {
        let card = card.copied().unwrap_or_else(CardState::new_card);
        if !card.mastery.mastery.is_finite() {
            return Err(SrsError::InvalidMastery(card.mastery.mastery));
        }

        let schedule = compute_schedule(&card.schedule, evaluation, &mut self.fuzz)?;
        let due_date = resolve_due_date(schedule.interval, self.clock.now())?;
        // Mastery keys on the streak the card had coming into this review.
        let mastery = update_mastery(&card.mastery, card.schedule.streak, evaluation.score);

        tracing::debug!(
            score = evaluation.score.get(),
            lateness = evaluation.lateness,
            streak = schedule.streak,
            interval = schedule.interval,
            mastery = mastery.mastery,
            %due_date,
            "review applied"
        );

        Ok(ReviewOutcome {
            streak: schedule.streak,
            e_factor: schedule.e_factor,
            interval: schedule.interval,
            due_date,
            mastery: mastery.mastery,
            total_reviews: mastery.total_reviews,
        })
    }

    /// Score a self-rating, measure lateness against the card's due date and
    /// apply the result. Returns the evaluation alongside the outcome so
    /// callers can record what was applied.
    pub fn review_rating(
        &mut self,
        card: Option<&CardState>,
        rating: Rating,
        elapsed_secs: f64,
    ) -> Result<(Evaluation, ReviewOutcome), SrsError> {
        let score = rating.score(elapsed_secs)?;
        let lateness = card.map_or(0.0, |card| {
            compute_lateness(
                card.due_date,
                self.clock.now(),
                card.schedule.interval,
                self.lateness_unit,
            )
        });

        let evaluation = Evaluation::new(score, lateness)?;
        let outcome = self.review(card, &evaluation)?;
        Ok((evaluation, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardSchedule, FixedClock, FixedFuzz, MIN_E_FACTOR, MasteryState, Score};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 18, 0, 0).unwrap()
    }

    fn scheduler() -> Scheduler<FixedFuzz, FixedClock> {
        Scheduler::with_parts(FixedFuzz::NONE, FixedClock(now()))
    }

    fn eval(score: u8, lateness: f64) -> Evaluation {
        Evaluation::new(Score::new(score).unwrap(), lateness).unwrap()
    }

    #[test]
    fn test_new_card_review() {
        let outcome = scheduler().review(None, &eval(4, 0.0)).unwrap();
        assert_eq!(outcome.streak, 1);
        assert_eq!(outcome.e_factor, 2.5);
        assert_eq!(outcome.mastery, 65.0);
        assert_eq!(outcome.total_reviews, 1);
        assert_eq!(outcome.due_date, now() + Duration::minutes(30));
    }

    #[test]
    fn test_mastery_uses_streak_before_review() {
        // Streak 3 qualifies for the recovery bonus; the engine moves it to 4.
        let card = CardState {
            schedule: CardSchedule {
                streak: 3,
                e_factor: 2.5,
                interval: 1.0,
            },
            mastery: MasteryState {
                mastery: 40.0,
                total_reviews: 8,
            },
            due_date: Some(now()),
        };

        let outcome = scheduler().review(Some(&card), &eval(3, 0.0)).unwrap();
        assert_eq!(outcome.streak, 4);
        assert!((outcome.mastery - 52.0).abs() < 1e-9);
        assert_eq!(outcome.total_reviews, 9);
    }

    #[test]
    fn test_review_rating_measures_lateness() {
        let card = CardState {
            schedule: CardSchedule {
                streak: 5,
                e_factor: 2.5,
                interval: 6.0,
            },
            mastery: MasteryState {
                mastery: 60.0,
                total_reviews: 7,
            },
            due_date: Some(now() - Duration::hours(12)),
        };

        // 12 hours late in hours is past the lateness cap.
        let (evaluation, outcome) = scheduler()
            .review_rating(Some(&card), Rating::Easy, 2.0)
            .unwrap();
        assert_eq!(evaluation.score.get(), 5);
        assert!((evaluation.lateness - 12.0).abs() < 1e-9);
        let miss: f64 = 5.0 - 6.5;
        let expected = 2.5 + (0.1 - miss * (0.08 + miss * 0.02));
        assert!((outcome.e_factor - expected).abs() < 1e-9);

        // Half a day on a six-day interval is 1/12 of the interval: on time.
        let (evaluation, outcome) = scheduler()
            .lateness_unit(LatenessUnit::IntervalFraction)
            .review_rating(Some(&card), Rating::Easy, 2.0)
            .unwrap();
        assert!((evaluation.lateness - 0.5 / 6.0).abs() < 1e-9);
        assert!((outcome.e_factor - 2.6).abs() < 1e-9);
        assert_eq!(outcome.due_date, now() + Duration::days(16));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            scheduler().review_rating(None, Rating::Good, -3.0),
            Err(SrsError::InvalidElapsed(-3.0))
        );

        let corrupt = CardState {
            mastery: MasteryState {
                mastery: f64::NAN,
                total_reviews: 2,
            },
            ..CardState::new_card()
        };
        assert!(scheduler().review(Some(&corrupt), &eval(3, 0.0)).is_err());
    }

    #[test]
    fn test_invariants_over_a_review_history() {
        let mut scheduler = Scheduler::with_parts(
            RandomFuzz::new(<rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(11)),
            FixedClock(now()),
        )
        .lateness_unit(LatenessUnit::IntervalFraction);

        let ratings = [
            Rating::Good,
            Rating::Easy,
            Rating::Hard,
            Rating::Fail,
            Rating::Good,
            Rating::Good,
            Rating::Easy,
            Rating::Easy,
            Rating::Hard,
            Rating::Fail,
            Rating::Easy,
        ];

        let mut card: Option<CardState> = None;
        let mut streak = 0;
        for (i, rating) in ratings.into_iter().enumerate() {
            let (_, outcome) = scheduler
                .review_rating(card.as_ref(), rating, 4.0)
                .unwrap();

            if rating == Rating::Fail {
                streak = 0;
            } else {
                streak += 1;
            }
            assert_eq!(outcome.streak, streak);
            assert!(outcome.e_factor >= MIN_E_FACTOR);
            assert!(outcome.interval > 0.0);
            assert!((0.0..=100.0).contains(&outcome.mastery));
            assert_eq!(outcome.total_reviews as usize, i + 1);

            card = Some(outcome.into_state());
        }
    }
}
