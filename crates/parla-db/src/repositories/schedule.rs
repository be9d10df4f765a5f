use chrono::{DateTime, Utc};
use parla_srs::ReviewOutcome;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{CardScheduleRow, NewReviewEvent};

/// Create the default scheduling row for a card if it has none yet.
pub async fn ensure_card_schedule<'e, E>(
    executor: E,
    flashcard_id: Uuid,
    deck_id: Uuid,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO card_schedules (flashcard_id, deck_id)
            VALUES ($1, $2)
            ON CONFLICT (flashcard_id) DO NOTHING
        "#,
    )
    .bind(flashcard_id)
    .bind(deck_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Read a card's scheduling row and lock it until the transaction ends.
///
/// Concurrent reviews of the same card queue up here, so each one starts
/// from the state written by the previous one.
pub async fn lock_card_schedule<'e, E>(
    executor: E,
    flashcard_id: Uuid,
) -> Result<CardScheduleRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT flashcard_id, deck_id, streak, e_factor, interval_days, due_date,
                   mastery, total_reviews, last_review_at
            FROM card_schedules
            WHERE flashcard_id = $1
            FOR UPDATE
        "#,
    )
    .bind(flashcard_id)
    .fetch_one(executor)
    .await
}

pub async fn get_card_schedule<'e, E>(
    executor: E,
    flashcard_id: Uuid,
) -> Result<Option<CardScheduleRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT flashcard_id, deck_id, streak, e_factor, interval_days, due_date,
                   mastery, total_reviews, last_review_at
            FROM card_schedules
            WHERE flashcard_id = $1
        "#,
    )
    .bind(flashcard_id)
    .fetch_optional(executor)
    .await
}

/// Write back every field produced by a review.
pub async fn save_card_schedule<'e, E>(
    executor: E,
    flashcard_id: Uuid,
    outcome: &ReviewOutcome,
    reviewed_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE card_schedules
            SET streak = $2,
                e_factor = $3,
                interval_days = $4,
                due_date = $5,
                mastery = $6,
                total_reviews = $7,
                last_review_at = $8,
                updated_at = NOW()
            WHERE flashcard_id = $1
        "#,
    )
    .bind(flashcard_id)
    .bind(i32::try_from(outcome.streak).unwrap_or(i32::MAX))
    .bind(outcome.e_factor)
    .bind(outcome.interval)
    .bind(outcome.due_date)
    .bind(outcome.mastery)
    .bind(i32::try_from(outcome.total_reviews).unwrap_or(i32::MAX))
    .bind(reviewed_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_review_event<'e, E>(
    executor: E,
    event: &NewReviewEvent,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO review_events (
                flashcard_id, deck_id, rating, score, elapsed_seconds, lateness,
                streak, e_factor, interval_days, mastery
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(event.flashcard_id)
    .bind(event.deck_id)
    .bind(&event.rating)
    .bind(event.score)
    .bind(event.elapsed_seconds)
    .bind(event.lateness)
    .bind(event.streak)
    .bind(event.e_factor)
    .bind(event.interval_days)
    .bind(event.mastery)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn record_activity<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO review_activity (activity_date, reviews_count)
            VALUES (CURRENT_DATE, 1)
            ON CONFLICT (activity_date)
            DO UPDATE SET reviews_count = review_activity.reviews_count + 1
        "#,
    )
    .execute(executor)
    .await?;
    Ok(())
}
