use chrono::{DateTime, Utc};
use parla_srs::{FixedClock, LatenessUnit, RandomFuzz, Scheduler};
use sqlx::PgPool;

use crate::ApiConfig;

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: PgPool,
    pub lateness_unit: LatenessUnit,
    pub due_cards_limit: i64,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        tracing::info!(
            lateness_unit = ?config.lateness_unit,
            due_cards_limit = config.due_cards_limit,
            "scheduler configured"
        );

        Self {
            pool,
            lateness_unit: config.lateness_unit,
            due_cards_limit: config.due_cards_limit,
        }
    }

    /// A scheduler whose clock is pinned to `now`, so the due date and the
    /// stored review time agree.
    ///
    /// The returned scheduler holds a thread-local RNG and must not be kept
    /// across an `.await`.
    pub fn scheduler(&self, now: DateTime<Utc>) -> Scheduler<RandomFuzz, FixedClock> {
        Scheduler::with_parts(RandomFuzz::default(), FixedClock(now))
            .lateness_unit(self.lateness_unit)
    }
}
