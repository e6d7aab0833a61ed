//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::error::Result;
use crate::types::{CardMemoryState, Rating, SchedulerSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single review as submitted by a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub rating: Rating,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewOutcome {
    pub fn new(rating: Rating, reviewed_at: DateTime<Utc>) -> Self {
        Self { rating, reviewed_at }
    }
}

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub state: CardMemoryState,
    /// The card sits on a short step and should come back in this session.
    pub requeue_immediately: bool,
}

impl ReviewResult {
    pub fn next_due(&self) -> DateTime<Utc> {
        self.state.due_at
    }
}

/// What each of the four grades would do to a card, without committing any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPreview {
    pub again: ReviewResult,
    pub hard: ReviewResult,
    pub good: ReviewResult,
    pub easy: ReviewResult,
}

impl ReviewPreview {
    pub fn get(&self, rating: Rating) -> &ReviewResult {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next state after a review. Never mutates `state`.
    fn compute_next(&self, state: &CardMemoryState, outcome: &ReviewOutcome) -> Result<ReviewResult>;

    /// Initial state for a card added at `created_at`.
    fn initial_state(&self, created_at: DateTime<Utc>) -> CardMemoryState;

    /// Results for every grade at `reviewed_at`.
    fn preview(&self, state: &CardMemoryState, reviewed_at: DateTime<Utc>) -> Result<ReviewPreview> {
        let next = |rating| self.compute_next(state, &ReviewOutcome::new(rating, reviewed_at));
        Ok(ReviewPreview {
            again: next(Rating::Again)?,
            hard: next(Rating::Hard)?,
            good: next(Rating::Good)?,
            easy: next(Rating::Easy)?,
        })
    }
}

/// Get algorithm by name, configured with `settings`.
pub fn get_algorithm(
    name: &str,
    settings: SchedulerSettings,
) -> Option<Result<Box<dyn SpacedRepetitionAlgorithm>>> {
    match name {
        "sm2" => Some(
            sm2::Sm2::new(settings).map(|sm2| Box::new(sm2) as Box<dyn SpacedRepetitionAlgorithm>),
        ),
        _ => None,
    }
}
