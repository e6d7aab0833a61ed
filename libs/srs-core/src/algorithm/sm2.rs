//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with Anki-style learning and relearning steps:
//! - New and lapsed cards walk through short steps (minutes) before
//!   graduating to day-scale review intervals.
//! - Review intervals grow by the ease factor, which Hard/Easy/Again adjust.
//! - The ease factor stays between the configured minimum (1.3 or more) and 5.0.

use super::{ReviewOutcome, ReviewResult, SpacedRepetitionAlgorithm};
use crate::error::{Result, SchedulerError};
use crate::types::{
    CardMemoryState, CardStatus, Rating, ReviewOrderPolicy, SchedulerSettings, EASE_CEILING, MINUTES_PER_DAY,
};
use chrono::{DateTime, Duration, Utc};

const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;
const LAPSE_EASE_PENALTY: f64 = 0.20;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone, Default)]
pub struct Sm2 {
    settings: SchedulerSettings,
}

/// Where a review sends the card.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Next {
    Step {
        status: CardStatus,
        index: usize,
        minutes: u32,
    },
    Review {
        days: f64,
    },
}

impl Sm2 {
    /// Build a scheduler, rejecting settings that could break state invariants.
    pub fn new(settings: SchedulerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, created_at: DateTime<Utc>) -> CardMemoryState {
        CardMemoryState::with_ease(created_at, self.settings.starting_ease)
    }

    fn compute_next(&self, state: &CardMemoryState, outcome: &ReviewOutcome) -> Result<ReviewResult> {
        check_state(state)?;
        let reviewed_at = self.review_time(state, outcome.reviewed_at)?;
        let rating = outcome.rating;
        let ease = state.ease_factor.clamp(self.settings.minimum_ease, EASE_CEILING);

        let (next, ease_factor, lapses, relearn_interval_days) = match state.status {
            CardStatus::New | CardStatus::Learning => {
                (self.schedule_learning(state, rating), ease, state.lapses, None)
            }
            CardStatus::Relearning => {
                let next = self.schedule_relearning(state, rating);
                let pending = match next {
                    Next::Step { .. } => state.relearn_interval_days,
                    Next::Review { .. } => None,
                };
                (next, ease, state.lapses, pending)
            }
            CardStatus::Review => self.schedule_review(state, ease, rating),
        };

        let (status, step_index, interval_days, delay) = match next {
            Next::Step { status, index, minutes } => (
                status,
                index,
                f64::from(minutes) / MINUTES_PER_DAY,
                Duration::try_minutes(i64::from(minutes)),
            ),
            Next::Review { days } => (CardStatus::Review, 0, days, Duration::try_days(days as i64)),
        };

        let due_at = delay
            .and_then(|delay| reviewed_at.checked_add_signed(delay))
            .ok_or_else(|| {
                SchedulerError::InvalidState(format!("due date overflows after review at {}", reviewed_at))
            })?;

        let repetitions = if rating.is_success() {
            state.repetitions.saturating_add(1)
        } else {
            0
        };

        let new_state = CardMemoryState {
            status,
            repetitions,
            interval_days,
            ease_factor,
            step_index,
            lapses,
            reviews_count: state.reviews_count.saturating_add(1),
            relearn_interval_days,
            due_at,
            last_reviewed_at: Some(reviewed_at),
        };
        debug_check_invariants(&new_state, reviewed_at, self.settings.minimum_ease);

        Ok(ReviewResult {
            requeue_immediately: new_state.status.is_in_steps(),
            state: new_state,
        })
    }
}

impl Sm2 {
    fn review_time(&self, state: &CardMemoryState, reviewed_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match state.last_reviewed_at {
            Some(last) if reviewed_at < last => match self.settings.review_order {
                ReviewOrderPolicy::Reject => Err(SchedulerError::NonMonotonicReview {
                    reviewed_at,
                    last_reviewed_at: last,
                }),
                ReviewOrderPolicy::Clamp => Ok(last),
            },
            _ => Ok(reviewed_at),
        }
    }

    fn schedule_learning(&self, state: &CardMemoryState, rating: Rating) -> Next {
        let steps = &self.settings.learning_steps;
        match rating {
            Rating::Again => step(CardStatus::Learning, steps, 0),
            Rating::Easy => Next::Review {
                days: self.review_days(self.settings.easy_interval),
            },
            Rating::Hard | Rating::Good => {
                // A new card counts as sitting on the first step.
                let current = match state.status {
                    CardStatus::New => 0,
                    _ => state.step_index,
                };
                let index = current.saturating_add(1);
                if index < steps.len() {
                    step(CardStatus::Learning, steps, index)
                } else {
                    Next::Review {
                        days: self.review_days(self.settings.graduating_interval),
                    }
                }
            }
        }
    }

    fn schedule_relearning(&self, state: &CardMemoryState, rating: Rating) -> Next {
        let steps = &self.settings.relearning_steps;
        let graduate = Next::Review {
            days: self.relearn_graduation_days(state),
        };
        match rating {
            Rating::Again => step(CardStatus::Relearning, steps, 0),
            Rating::Easy => graduate,
            Rating::Hard | Rating::Good => {
                let index = state.step_index.saturating_add(1);
                if index < steps.len() {
                    step(CardStatus::Relearning, steps, index)
                } else {
                    graduate
                }
            }
        }
    }

    fn schedule_review(
        &self,
        state: &CardMemoryState,
        ease: f64,
        rating: Rating,
    ) -> (Next, f64, u32, Option<f64>) {
        let old = state.interval_days.round().max(1.0);
        let good_days = self.review_days((old * ease).round().max(old + 1.0));

        match rating {
            Rating::Again => {
                let kept = (old * self.settings.lapse_multiplier).round();
                let relearn_days = self.review_days(kept.max(self.settings.minimum_lapse_interval));
                (
                    step(CardStatus::Relearning, &self.settings.relearning_steps, 0),
                    self.adjust_ease(ease - LAPSE_EASE_PENALTY),
                    state.lapses.saturating_add(1),
                    Some(relearn_days),
                )
            }
            Rating::Hard => (
                Next::Review {
                    days: self.review_days(old * self.settings.hard_multiplier),
                },
                self.adjust_ease(ease - HARD_EASE_PENALTY),
                state.lapses,
                None,
            ),
            Rating::Good => (Next::Review { days: good_days }, ease, state.lapses, None),
            Rating::Easy => {
                let easy_days = (old * ease * self.settings.easy_bonus).round().max(good_days + 1.0);
                (
                    Next::Review {
                        days: self.review_days(easy_days),
                    },
                    self.adjust_ease(ease + EASY_EASE_BONUS),
                    state.lapses,
                    None,
                )
            }
        }
    }

    fn relearn_graduation_days(&self, state: &CardMemoryState) -> f64 {
        let floor = self.settings.minimum_lapse_interval;
        let days = state.relearn_interval_days.unwrap_or(floor);
        self.review_days(days.max(floor))
    }

    /// Round to whole days within `[1, maximum_interval]`.
    fn review_days(&self, days: f64) -> f64 {
        let ceiling = self.settings.maximum_interval.floor().max(1.0);
        days.round().clamp(1.0, ceiling)
    }

    /// Keep two decimals so repeated adjustments never drift, then bound.
    fn adjust_ease(&self, ease: f64) -> f64 {
        ((ease * 100.0).round() / 100.0).clamp(self.settings.minimum_ease, EASE_CEILING)
    }
}

fn step(status: CardStatus, steps: &[u32], index: usize) -> Next {
    Next::Step {
        status,
        index,
        minutes: steps[index],
    }
}

fn check_state(state: &CardMemoryState) -> Result<()> {
    if !state.interval_days.is_finite() || state.interval_days < 0.0 {
        return Err(SchedulerError::InvalidState(format!(
            "interval_days must be a non-negative number, got {}",
            state.interval_days
        )));
    }
    if !state.ease_factor.is_finite() {
        return Err(SchedulerError::InvalidState(format!(
            "ease_factor must be finite, got {}",
            state.ease_factor
        )));
    }
    if let Some(days) = state.relearn_interval_days {
        if !days.is_finite() || days < 0.0 {
            return Err(SchedulerError::InvalidState(format!(
                "relearn_interval_days must be a non-negative number, got {}",
                days
            )));
        }
    }
    Ok(())
}

fn debug_check_invariants(state: &CardMemoryState, reviewed_at: DateTime<Utc>, minimum_ease: f64) {
    debug_assert!(
        (minimum_ease..=EASE_CEILING).contains(&state.ease_factor),
        "ease factor {} outside [{}, {}]",
        state.ease_factor,
        minimum_ease,
        EASE_CEILING
    );
    debug_assert!(state.interval_days >= 0.0, "negative interval {}", state.interval_days);
    debug_assert!(
        state.status != CardStatus::Review
            || (state.interval_days >= 1.0 && state.interval_days.fract() == 0.0),
        "review interval {} is not a whole number of days",
        state.interval_days
    );
    debug_assert!(state.due_at >= reviewed_at, "due date precedes review");
}
