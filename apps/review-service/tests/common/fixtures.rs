//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

/// Fixed instant all scenarios start from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap()
}

/// Format a timestamp the way clients send it.
pub fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Create a card registration request body.
pub fn create_card_request(card_id: i64, created_at: DateTime<Utc>) -> serde_json::Value {
    json!({ "cardId": card_id, "createdAt": iso(created_at) })
}

/// Create a registration request body for a card in a deck.
pub fn create_deck_card_request(card_id: i64, deck_id: i64, created_at: DateTime<Utc>) -> serde_json::Value {
    json!({ "cardId": card_id, "deckId": deck_id, "createdAt": iso(created_at) })
}

/// Create a review batch body in the client's shape.
pub fn submit_review_request(reviews: &[(i64, &str)], reviewed_at: DateTime<Utc>) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = reviews
        .iter()
        .map(|(card_id, quality)| json!({ "cardId": card_id, "quality": quality }))
        .collect();
    json!({ "CardReviews": entries, "reviewedAt": iso(reviewed_at) })
}

/// Create a single review entry carrying its own timestamp.
pub fn card_review(card_id: i64, quality: &str, reviewed_at: DateTime<Utc>) -> serde_json::Value {
    json!({ "cardId": card_id, "quality": quality, "reviewedAt": iso(reviewed_at) })
}
