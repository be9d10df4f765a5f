use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{CardScheduleRow, DeckMastery};

/// Cards of a deck that are due at `now`, most overdue first.
///
/// Never-reviewed cards have no due date and come first.
pub async fn list_due_cards<'e, E>(
    executor: E,
    deck_id: Uuid,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<CardScheduleRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT flashcard_id, deck_id, streak, e_factor, interval_days, due_date,
                   mastery, total_reviews, last_review_at
            FROM card_schedules
            WHERE deck_id = $1
              AND (due_date IS NULL OR due_date <= $2)
            ORDER BY due_date ASC NULLS FIRST, flashcard_id
            LIMIT $3
        "#,
    )
    .bind(deck_id)
    .bind(now)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn deck_mastery<'e, E>(
    executor: E,
    deck_id: Uuid,
    now: DateTime<Utc>,
) -> Result<DeckMastery, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                $1::uuid AS deck_id,
                COUNT(*) AS card_count,
                COUNT(*) FILTER (WHERE total_reviews > 0) AS reviewed_count,
                COUNT(*) FILTER (WHERE due_date IS NULL OR due_date <= $2) AS due_count,
                COALESCE(AVG(mastery), 0)::float8 AS average_mastery
            FROM card_schedules
            WHERE deck_id = $1
        "#,
    )
    .bind(deck_id)
    .bind(now)
    .fetch_one(executor)
    .await
}
