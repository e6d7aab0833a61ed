//! Spaced repetition scheduling core.
//!
//! Provides:
//! - SM-2 scheduler with learning and relearning steps
//! - Speculative previews of all four grades
//! - Consecutive study-day streaks
//! - Shared types (CardMemoryState, Rating, SchedulerSettings, etc.)
//!
//! Everything here is pure: the review instant is always a parameter and
//! results are fresh values, so schedulers can be shared across threads.

pub mod algorithm;
pub mod error;
pub mod format;
pub mod streak;
pub mod types;

pub use algorithm::sm2::Sm2;
pub use algorithm::{get_algorithm, ReviewOutcome, ReviewPreview, ReviewResult, SpacedRepetitionAlgorithm};
pub use error::{Result, SchedulerError};
pub use format::format_interval;
pub use streak::{current_streak, StudyStreak};
pub use types::{
    CardMemoryState, CardStatus, Rating, ReviewOrderPolicy, SchedulerSettings, DEFAULT_EASE, EASE_CEILING,
    EASE_FLOOR, MAX_INTERVAL_DAYS, MINUTES_PER_DAY,
};
