use axum::Router;

use crate::{deck, review, state::ApiState};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(review::routes())
        .merge(deck::routes())
}
