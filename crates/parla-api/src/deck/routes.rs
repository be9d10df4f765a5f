use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;
use parla_db::{models::DeckMastery, repositories::deck};
use uuid::Uuid;
use validator::Validate;

use super::model::{DueCard, DueCardsQuery};
use crate::{ApiState, error::ApiError};

/// Create the deck routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks/{deck_id}/due", get(get_due_cards))
        .route("/decks/{deck_id}/mastery", get(get_deck_mastery))
}

/// Cards of a deck due for review now, never-reviewed cards first.
async fn get_due_cards(
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
    Query(query): Query<DueCardsQuery>,
) -> Result<Json<Vec<DueCard>>, ApiError> {
    query.validate()?;

    let limit = query
        .limit
        .unwrap_or(state.due_cards_limit)
        .min(state.due_cards_limit);

    let cards = deck::list_due_cards(&state.pool, deck_id, Utc::now(), limit).await?;
    tracing::debug!(%deck_id, due = cards.len(), "due cards listed");

    Ok(Json(cards.into_iter().map(DueCard::from).collect()))
}

async fn get_deck_mastery(
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckMastery>, ApiError> {
    let mastery = deck::deck_mastery(&state.pool, deck_id, Utc::now()).await?;

    if mastery.card_count == 0 {
        return Err(ApiError::NotFound(format!(
            "No scheduled cards in deck {deck_id}"
        )));
    }

    Ok(Json(mastery))
}
