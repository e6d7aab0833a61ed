//! Card registration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardStateResponse>)> {
    let created_at = payload.created_at.unwrap_or_else(Utc::now);
    let card = state
        .reviews
        .add_card(payload.card_id, payload.deck_id, created_at)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CardStateResponse::from_record(payload.card_id, &card)),
    ))
}

/// GET /api/cards/{card_id}
pub async fn get(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<CardStateResponse>> {
    let card = state.reviews.get_card(card_id).await?;
    Ok(Json(CardStateResponse::from_record(card_id, &card)))
}
