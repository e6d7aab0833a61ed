//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export shared types from srs-core
pub use srs_core::{
    format_interval, CardMemoryState, CardStatus, Rating, ReviewPreview, ReviewResult, StudyStreak,
};

// === Card Types ===

/// A registered card: its deck, if any, and its scheduling state
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub deck_id: Option<i64>,
    pub state: CardMemoryState,
}

/// Request to register a card with the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub card_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Stored scheduling state of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStateResponse {
    pub card_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<i64>,
    pub status: CardStatus,
    pub repetitions: u32,
    /// Interval rounded to whole days
    pub interval: i64,
    pub interval_days: f64,
    pub e_factor: f64,
    pub lapses: u32,
    pub reviews_count: u32,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl CardStateResponse {
    pub fn from_record(card_id: i64, record: &CardRecord) -> Self {
        let state = &record.state;
        Self {
            card_id,
            deck_id: record.deck_id,
            status: state.status,
            repetitions: state.repetitions,
            interval: state.interval_whole_days(),
            interval_days: state.interval_days,
            e_factor: state.ease_factor,
            lapses: state.lapses,
            reviews_count: state.reviews_count,
            next_review_date: state.due_at,
            last_reviewed_at: state.last_reviewed_at,
        }
    }
}

// === Review Types ===

/// One graded card inside a review submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReview {
    pub card_id: i64,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Batch of reviews, applied in order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    #[serde(rename = "CardReviews", alias = "cardReviews")]
    pub card_reviews: Vec<CardReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// A review with its grade parsed and timestamp resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReview {
    pub card_id: i64,
    pub rating: Rating,
    pub reviewed_at: DateTime<Utc>,
}

impl SubmitReviewRequest {
    /// Parse every grade up front so a bad entry rejects the whole batch.
    ///
    /// An entry's own `reviewedAt` wins over the batch timestamp, which wins
    /// over `now`.
    pub fn into_pending(self, now: DateTime<Utc>) -> Result<Vec<PendingReview>> {
        let batch_time = self.reviewed_at.unwrap_or(now);
        self.card_reviews
            .into_iter()
            .map(|review| -> Result<PendingReview> {
                Ok(PendingReview {
                    card_id: review.card_id,
                    rating: review.quality.parse()?,
                    reviewed_at: review.reviewed_at.unwrap_or(batch_time),
                })
            })
            .collect()
    }
}

/// Outcome of one review, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub card_id: i64,
    pub repetitions: u32,
    pub interval: i64,
    pub interval_days: f64,
    pub e_factor: f64,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub new_status: CardStatus,
    /// Show the card again later in this session
    pub requeue: bool,
}

impl ReviewResponse {
    pub fn from_result(card_id: i64, result: &ReviewResult) -> Self {
        let state = &result.state;
        Self {
            card_id,
            repetitions: state.repetitions,
            interval: state.interval_whole_days(),
            interval_days: state.interval_days,
            e_factor: state.ease_factor,
            next_review_date: state.due_at,
            last_reviewed_at: state.last_reviewed_at,
            new_status: state.status,
            requeue: result.requeue_immediately,
        }
    }
}

// === Preview Types ===

/// Optional evaluation instant; the server clock when absent
#[derive(Debug, Clone, Deserialize)]
pub struct InstantQuery {
    pub at: Option<DateTime<Utc>>,
}

/// What one grade would do, with a label for the answer button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOption {
    pub interval: i64,
    pub interval_days: f64,
    pub e_factor: f64,
    pub next_review_date: DateTime<Utc>,
    pub new_status: CardStatus,
    pub label: String,
}

impl PreviewOption {
    pub fn from_result(result: &ReviewResult) -> Self {
        let state = &result.state;
        Self {
            interval: state.interval_whole_days(),
            interval_days: state.interval_days,
            e_factor: state.ease_factor,
            next_review_date: state.due_at,
            new_status: state.status,
            label: format_interval(state.interval_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub card_id: i64,
    pub again: PreviewOption,
    pub hard: PreviewOption,
    pub good: PreviewOption,
    pub easy: PreviewOption,
}

impl PreviewResponse {
    pub fn from_preview(card_id: i64, preview: &ReviewPreview) -> Self {
        Self {
            card_id,
            again: PreviewOption::from_result(&preview.again),
            hard: PreviewOption::from_result(&preview.hard),
            good: PreviewOption::from_result(&preview.good),
            easy: PreviewOption::from_result(&preview.easy),
        }
    }
}

// === Study Queue Types ===

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueueQuery {
    pub limit: Option<usize>,
    pub at: Option<DateTime<Utc>>,
    pub deck_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueueResponse {
    pub cards: Vec<CardStateResponse>,
    pub total_due: usize,
}

// === Streak Types ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsecutiveDaysResponse {
    pub consecutive_days: u32,
    pub streak_start_date: Option<NaiveDate>,
    pub last_study_date: Option<NaiveDate>,
}

impl From<StudyStreak> for ConsecutiveDaysResponse {
    fn from(streak: StudyStreak) -> Self {
        Self {
            consecutive_days: streak.consecutive_days,
            streak_start_date: streak.streak_start,
            last_study_date: streak.last_study_date,
        }
    }
}
