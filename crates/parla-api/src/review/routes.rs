use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use parla_db::{
    models::NewReviewEvent,
    repositories::schedule,
};
use parla_srs::{CardState, Evaluation, ReviewOutcome, Score};
use uuid::Uuid;
use validator::Validate;

use super::model::{
    CardScheduleResponse, ReviewResponse, ReviewSubmission, SchedulePreviewRequest,
};
use crate::{ApiState, error::ApiError, metrics};

/// Create the review routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/cards/{flashcard_id}/review", post(submit_review))
        .route("/cards/{flashcard_id}/schedule", get(get_schedule))
        .route("/schedule/preview", post(preview_schedule))
}

async fn submit_review(
    State(state): State<ApiState>,
    Path(flashcard_id): Path<Uuid>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewResponse>, ApiError> {
    payload.validate()?;

    let now = Utc::now();

    // Single transaction; the row lock serializes reviews of the same card
    let mut tx = state.pool.begin().await?;

    schedule::ensure_card_schedule(&mut *tx, flashcard_id, payload.deck_id).await?;
    let row = schedule::lock_card_schedule(&mut *tx, flashcard_id).await?;

    if row.deck_id != payload.deck_id {
        return Err(ApiError::Conflict(format!(
            "Flashcard {flashcard_id} does not belong to deck {}",
            payload.deck_id
        )));
    }

    let card = CardState::from(&row);
    // The scheduler holds a thread-local RNG and is dropped before the next await
    let (evaluation, outcome) = state.scheduler(now).review_rating(
        Some(&card),
        payload.rating,
        payload.elapsed_seconds,
    )?;

    schedule::save_card_schedule(&mut *tx, flashcard_id, &outcome, now).await?;

    let event = NewReviewEvent {
        flashcard_id,
        deck_id: payload.deck_id,
        rating: payload.rating.to_string(),
        score: i16::from(evaluation.score.get()),
        elapsed_seconds: payload.elapsed_seconds,
        lateness: evaluation.lateness,
        streak: i32::try_from(outcome.streak).unwrap_or(i32::MAX),
        e_factor: outcome.e_factor,
        interval_days: outcome.interval,
        mastery: outcome.mastery,
    };
    schedule::insert_review_event(&mut *tx, &event).await?;
    schedule::record_activity(&mut *tx).await?;

    tx.commit().await?;

    metrics::record_review_event(payload.rating, evaluation.score.is_pass());
    tracing::info!(
        %flashcard_id,
        deck_id = %payload.deck_id,
        rating = %payload.rating,
        score = evaluation.score.get(),
        streak = outcome.streak,
        interval = outcome.interval,
        due_date = %outcome.due_date,
        "review recorded"
    );

    Ok(Json(ReviewResponse {
        flashcard_id,
        deck_id: payload.deck_id,
        score: evaluation.score.get(),
        lateness: evaluation.lateness,
        outcome,
    }))
}

async fn get_schedule(
    State(state): State<ApiState>,
    Path(flashcard_id): Path<Uuid>,
) -> Result<Json<CardScheduleResponse>, ApiError> {
    let row = schedule::get_card_schedule(&state.pool, flashcard_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No schedule for flashcard {flashcard_id}")))?;

    Ok(Json(row.into()))
}

/// Run the scheduler on caller-supplied state without storing anything.
async fn preview_schedule(
    State(state): State<ApiState>,
    Json(payload): Json<SchedulePreviewRequest>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    payload.validate()?;

    let evaluation = Evaluation::new(Score::new(payload.score)?, payload.lateness)?;
    let card = payload.card();
    let outcome = state
        .scheduler(Utc::now())
        .review(card.as_ref(), &evaluation)?;

    Ok(Json(outcome))
}
