//! Deck-scoped study API tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate};
use serde_json::json;

use common::fixtures::{base_time, iso};
use common::TestContext;

fn ids(cards: &serde_json::Value) -> Vec<i64> {
    cards
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["cardId"].as_i64().unwrap())
        .collect()
}

/// Test registering a card in a deck echoes the deck.
#[tokio::test]
async fn test_create_card_in_deck() {
    let ctx = TestContext::new();
    ctx.create_deck_card(1, 5, base_time()).await;

    let card = ctx.card(1).await;
    assert_eq!(card["deckId"], 5);
}

/// Test starting a session returns only that deck's due cards.
#[tokio::test]
async fn test_start_session() {
    let ctx = TestContext::new();
    let start = base_time();
    ctx.create_deck_card(1, 5, start - Duration::hours(1)).await;
    ctx.create_deck_card(2, 6, start - Duration::hours(1)).await;
    ctx.create_deck_card(3, 5, start + Duration::hours(1)).await;
    ctx.create_deck_card(4, 5, start - Duration::hours(2)).await;

    let response = ctx
        .server()
        .get("/api/study/start/5")
        .add_query_param("at", iso(start))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(ids(&body), vec![4, 1]);
}

/// Test starting a session for a deck with no cards.
#[tokio::test]
async fn test_start_session_unknown_deck() {
    let ctx = TestContext::new();

    let response = ctx.server().get("/api/study/start/77").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
}

/// Test the queue can be narrowed to one deck.
#[tokio::test]
async fn test_queue_filtered_by_deck() {
    let ctx = TestContext::new();
    let start = base_time();
    ctx.create_deck_card(1, 5, start).await;
    ctx.create_deck_card(2, 6, start).await;
    ctx.create_card(3, start).await;

    let response = ctx
        .server()
        .get("/api/study/queue")
        .add_query_param("at", iso(start))
        .add_query_param("deckId", 6)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(ids(&body["cards"]), vec![2]);
    assert_eq!(body["totalDue"], 1);
}

/// Test the streak counts consecutive days with reviews in the deck.
#[tokio::test]
async fn test_consecutive_days() {
    let ctx = TestContext::new();
    let start = base_time();
    ctx.create_deck_card(1, 5, start).await;

    let response = ctx
        .server()
        .get("/api/study/consecutive-days/5")
        .add_query_param("at", iso(start))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        json!({ "consecutiveDays": 0, "streakStartDate": null, "lastStudyDate": null })
    );

    for day in 0..2 {
        ctx.submit(&[(1, "Again")], start + Duration::days(day))
            .await
            .assert_status_ok();
    }

    let response = ctx
        .server()
        .get("/api/study/consecutive-days/5")
        .add_query_param("at", iso(start + Duration::days(1)))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["consecutiveDays"], 2);
    assert_eq!(body["streakStartDate"], "2026-09-01");
    assert_eq!(body["lastStudyDate"], "2026-09-02");
}

/// Test a missed day resets the streak but keeps the last study date.
#[tokio::test]
async fn test_consecutive_days_broken_streak() {
    let ctx = TestContext::new();
    let start = base_time();
    ctx.create_deck_card(1, 5, start).await;
    ctx.submit(&[(1, "Good")], start).await.assert_status_ok();

    let response = ctx
        .server()
        .get("/api/study/consecutive-days/5")
        .add_query_param("at", iso(start + Duration::days(3)))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["consecutiveDays"], 0);
    let last = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    assert_eq!(body["lastStudyDate"], last.to_string());
}

/// Test the streak of an unknown deck.
#[tokio::test]
async fn test_consecutive_days_unknown_deck() {
    let ctx = TestContext::new();

    let response = ctx.server().get("/api/study/consecutive-days/77").await;
    response.assert_status(StatusCode::NOT_FOUND);
}
