//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wrapping an in-memory review service behind a test server
//! - Helpers for registering cards and submitting reviews

#![allow(dead_code)]

pub mod fixtures;

use axum_test::{TestResponse, TestServer};
use chrono::{DateTime, Utc};

use review_service::config::Config;
use review_service::services::review::ReviewService;
use review_service::{build_router, AppState};

/// Test context holding a server backed by a fresh, empty card store.
pub struct TestContext {
    server: TestServer,
}

impl TestContext {
    /// Create a context with default scheduler settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a context with custom configuration.
    ///
    /// # Panics
    /// Panics if the configuration does not describe a known algorithm.
    pub fn with_config(config: Config) -> Self {
        let reviews = ReviewService::from_config(&config).expect("Invalid test configuration");
        let app = build_router(AppState::new(reviews));
        let server = TestServer::new(app).expect("Failed to start test server");
        Self { server }
    }

    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// Register a card and assert it was created.
    pub async fn create_card(&self, card_id: i64, created_at: DateTime<Utc>) {
        self.server
            .post("/api/cards")
            .json(&fixtures::create_card_request(card_id, created_at))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    /// Register a card in a deck and assert it was created.
    pub async fn create_deck_card(&self, card_id: i64, deck_id: i64, created_at: DateTime<Utc>) {
        self.server
            .post("/api/cards")
            .json(&fixtures::create_deck_card_request(card_id, deck_id, created_at))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    /// Submit a batch where every entry shares `reviewed_at`.
    pub async fn submit(&self, reviews: &[(i64, &str)], reviewed_at: DateTime<Utc>) -> TestResponse {
        self.server
            .post("/api/study/review")
            .json(&fixtures::submit_review_request(reviews, reviewed_at))
            .await
    }

    /// Fetch a card's stored state as JSON.
    pub async fn card(&self, card_id: i64) -> serde_json::Value {
        let response = self.server.get(&format!("/api/cards/{}", card_id)).await;
        response.assert_status_ok();
        response.json()
    }
}
