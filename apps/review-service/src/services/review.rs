//! Review service: applies graded reviews to stored cards.

use chrono::{DateTime, Utc};
use srs_core::{current_streak, get_algorithm, ReviewOutcome, SpacedRepetitionAlgorithm, StudyStreak};

use crate::config::{Config, ConfigError};
use crate::error::{ApiError, Result};
use crate::models::{CardRecord, PendingReview, ReviewPreview, ReviewResult};
use crate::store::CardStore;

/// Scheduler plus the card store it reads from and writes to.
pub struct ReviewService {
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    store: CardStore,
}

impl ReviewService {
    pub fn new(algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        Self {
            algorithm,
            store: CardStore::new(),
        }
    }

    /// Build the configured algorithm with an empty store.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let algorithm = get_algorithm(&config.algorithm, config.scheduler.clone())
            .ok_or_else(|| ConfigError::UnknownAlgorithm(config.algorithm.clone()))??;
        Ok(Self::new(algorithm))
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Register a card, due immediately.
    pub async fn add_card(
        &self,
        card_id: i64,
        deck_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<CardRecord> {
        let record = CardRecord {
            deck_id,
            state: self.algorithm.initial_state(created_at),
        };
        self.store.insert_card(card_id, record.clone()).await?;
        tracing::info!(card_id, deck_id, "Added card");
        Ok(record)
    }

    pub async fn get_card(&self, card_id: i64) -> Result<CardRecord> {
        self.store
            .get_card(card_id)
            .await
            .ok_or_else(|| card_not_found(card_id))
    }

    /// Apply reviews in order. Entries for the same card see the state left by
    /// earlier entries. Any failure rejects the whole batch.
    pub async fn submit_reviews(&self, reviews: &[PendingReview]) -> Result<Vec<ReviewResult>> {
        let algorithm = self.algorithm.as_ref();
        let outcome = self
            .store
            .update_batch(|cards| {
                reviews
                    .iter()
                    .map(|review| -> Result<ReviewResult> {
                        let state = cards
                            .get(review.card_id)
                            .ok_or_else(|| card_not_found(review.card_id))?;
                        let result = algorithm
                            .compute_next(state, &ReviewOutcome::new(review.rating, review.reviewed_at))?;

                        tracing::debug!(
                            card_id = review.card_id,
                            rating = %review.rating,
                            status = %result.state.status,
                            interval_days = result.state.interval_days,
                            "Scheduled review"
                        );

                        cards.record_review(review.card_id, result.state.clone());
                        Ok(result)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .await;

        if let Err(e) = &outcome {
            tracing::warn!("Rejected batch of {} reviews: {}", reviews.len(), e);
        }
        outcome
    }

    /// Results of all four grades at `at`. Stored state is not touched.
    pub async fn preview(&self, card_id: i64, at: DateTime<Utc>) -> Result<ReviewPreview> {
        let card = self.get_card(card_id).await?;
        Ok(self.algorithm.preview(&card.state, at)?)
    }

    /// Cards due at `at`, earliest first, plus the total due before `limit`.
    pub async fn due_cards(
        &self,
        at: DateTime<Utc>,
        limit: Option<usize>,
        deck_id: Option<i64>,
    ) -> (Vec<(i64, CardRecord)>, usize) {
        let mut due = self.store.get_due_cards(at, deck_id).await;
        let total = due.len();
        if let Some(limit) = limit {
            due.truncate(limit);
        }
        (due, total)
    }

    /// Every card of a deck that is due at `at`.
    pub async fn start_session(&self, deck_id: i64, at: DateTime<Utc>) -> Result<Vec<(i64, CardRecord)>> {
        self.ensure_deck(deck_id).await?;
        let cards = self.store.get_due_cards(at, Some(deck_id)).await;
        tracing::debug!(deck_id, due = cards.len(), "Started study session");
        Ok(cards)
    }

    /// Consecutive UTC days, up to `at`, on which the deck was reviewed.
    pub async fn consecutive_days(&self, deck_id: i64, at: DateTime<Utc>) -> Result<StudyStreak> {
        self.ensure_deck(deck_id).await?;
        let study_days = self.store.study_days(deck_id).await;
        Ok(current_streak(&study_days, at.date_naive()))
    }

    async fn ensure_deck(&self, deck_id: i64) -> Result<()> {
        if self.store.has_deck(deck_id).await {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("Deck {} not found", deck_id)))
        }
    }
}

fn card_not_found(card_id: i64) -> ApiError {
    ApiError::NotFound(format!("Card {} not found", card_id))
}
