//! Study endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/study/queue
pub async fn queue(
    State(state): State<AppState>,
    Query(query): Query<StudyQueueQuery>,
) -> Result<Json<StudyQueueResponse>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let (cards, total_due) = state
        .reviews
        .due_cards(at, query.limit, query.deck_id)
        .await;

    Ok(Json(StudyQueueResponse {
        cards: cards
            .iter()
            .map(|(id, card)| CardStateResponse::from_record(*id, card))
            .collect(),
        total_due,
    }))
}

/// GET /api/study/start/{deck_id}
pub async fn start(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Query(query): Query<InstantQuery>,
) -> Result<Json<Vec<CardStateResponse>>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let cards = state.reviews.start_session(deck_id, at).await?;

    Ok(Json(
        cards
            .iter()
            .map(|(id, card)| CardStateResponse::from_record(*id, card))
            .collect(),
    ))
}

/// POST /api/study/review
pub async fn review(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<Vec<ReviewResponse>>> {
    let card_ids: Vec<i64> = payload.card_reviews.iter().map(|r| r.card_id).collect();
    let pending = payload.into_pending(Utc::now())?;

    let results = state.reviews.submit_reviews(&pending).await?;

    Ok(Json(
        card_ids
            .into_iter()
            .zip(results.iter())
            .map(|(card_id, result)| ReviewResponse::from_result(card_id, result))
            .collect(),
    ))
}

/// GET /api/study/preview/{card_id}
pub async fn preview(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Query(query): Query<InstantQuery>,
) -> Result<Json<PreviewResponse>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let preview = state.reviews.preview(card_id, at).await?;

    Ok(Json(PreviewResponse::from_preview(card_id, &preview)))
}

/// GET /api/study/consecutive-days/{deck_id}
pub async fn consecutive_days(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Query(query): Query<InstantQuery>,
) -> Result<Json<ConsecutiveDaysResponse>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let streak = state.reviews.consecutive_days(deck_id, at).await?;

    Ok(Json(streak.into()))
}
