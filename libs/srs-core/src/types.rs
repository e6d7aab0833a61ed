//! Core types for the review scheduler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Lowest ease factor any configuration may allow.
pub const EASE_FLOOR: f64 = 1.3;

/// Highest ease factor a card can reach.
pub const EASE_CEILING: f64 = 5.0;

/// Ease factor given to freshly added cards.
pub const DEFAULT_EASE: f64 = 2.5;

/// Longest review interval any configuration may allow, in days.
pub const MAX_INTERVAL_DAYS: f64 = 36500.0;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Card learning status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        }
    }

    /// Whether the card is working through short intra-session steps.
    pub fn is_in_steps(&self) -> bool {
        matches!(self, Self::Learning | Self::Relearning)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality grade given for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(alias = "again")]
    Again,
    #[serde(alias = "hard")]
    Hard,
    #[serde(alias = "good")]
    Good,
    #[serde(alias = "easy")]
    Easy,
}

impl Rating {
    /// All grades, worst first.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }

    /// Anything but Again counts as a successful recall.
    pub fn is_success(self) -> bool {
        self != Self::Again
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = SchedulerError;

    /// Parse a quality string, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            _ => Err(SchedulerError::InvalidGrade(s.to_string())),
        }
    }
}

/// Per-card, per-learner memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMemoryState {
    pub status: CardStatus,
    pub repetitions: u32,
    /// Scheduled gap in days. Fractional while in learning or relearning steps.
    pub interval_days: f64,
    pub ease_factor: f64,
    /// Index of the step currently scheduled while in learning or relearning.
    #[serde(default)]
    pub step_index: usize,
    #[serde(default)]
    pub lapses: u32,
    #[serde(default)]
    pub reviews_count: u32,
    /// Interval the card returns to once relearning is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relearn_interval_days: Option<f64>,
    pub due_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl CardMemoryState {
    /// State of a card just added to a deck. It is due immediately.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self::with_ease(created_at, DEFAULT_EASE)
    }

    pub fn with_ease(created_at: DateTime<Utc>, ease_factor: f64) -> Self {
        Self {
            status: CardStatus::New,
            repetitions: 0,
            interval_days: 0.0,
            ease_factor,
            step_index: 0,
            lapses: 0,
            reviews_count: 0,
            relearn_interval_days: None,
            due_at: created_at,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }

    /// Interval rounded to whole days, as shown to learners.
    pub fn interval_whole_days(&self) -> i64 {
        self.interval_days.round() as i64
    }
}

/// What to do with a review whose timestamp precedes the card's last review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOrderPolicy {
    /// Fail with `SchedulerError::NonMonotonicReview`.
    #[default]
    Reject,
    /// Apply the review at the card's last review instant instead.
    Clamp,
}

impl FromStr for ReviewOrderPolicy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(SchedulerError::InvalidSettings(format!(
                "unknown review order policy: {}",
                other
            ))),
        }
    }
}

/// Tunable scheduler constants. Steps are in minutes, intervals in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub learning_steps: Vec<u32>,
    pub relearning_steps: Vec<u32>,
    pub graduating_interval: f64,
    pub easy_interval: f64,
    pub starting_ease: f64,
    pub minimum_ease: f64,
    pub easy_bonus: f64,
    pub hard_multiplier: f64,
    pub lapse_multiplier: f64,
    pub minimum_lapse_interval: f64,
    pub maximum_interval: f64,
    pub review_order: ReviewOrderPolicy,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            learning_steps: vec![1, 10],
            relearning_steps: vec![10],
            graduating_interval: 1.0,
            easy_interval: 4.0,
            starting_ease: DEFAULT_EASE,
            minimum_ease: EASE_FLOOR,
            easy_bonus: 1.3,
            hard_multiplier: 1.2,
            lapse_multiplier: 0.0,
            minimum_lapse_interval: 1.0,
            maximum_interval: MAX_INTERVAL_DAYS,
            review_order: ReviewOrderPolicy::default(),
        }
    }
}

impl SchedulerSettings {
    /// Check that the settings can only ever produce valid states.
    pub fn validate(&self) -> Result<()> {
        check_steps("learning_steps", &self.learning_steps)?;
        check_steps("relearning_steps", &self.relearning_steps)?;

        let numbers = [
            ("graduating_interval", self.graduating_interval),
            ("easy_interval", self.easy_interval),
            ("starting_ease", self.starting_ease),
            ("minimum_ease", self.minimum_ease),
            ("easy_bonus", self.easy_bonus),
            ("hard_multiplier", self.hard_multiplier),
            ("lapse_multiplier", self.lapse_multiplier),
            ("minimum_lapse_interval", self.minimum_lapse_interval),
            ("maximum_interval", self.maximum_interval),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite", name)));
            }
        }

        if self.minimum_ease < EASE_FLOOR {
            return Err(invalid(format!("minimum_ease must be at least {}", EASE_FLOOR)));
        }
        if self.starting_ease < self.minimum_ease {
            return Err(invalid("starting_ease must not be below minimum_ease"));
        }
        if self.starting_ease > EASE_CEILING {
            return Err(invalid(format!("starting_ease must not exceed {}", EASE_CEILING)));
        }
        if !(1.0..=MAX_INTERVAL_DAYS).contains(&self.maximum_interval) {
            return Err(invalid(format!(
                "maximum_interval must be between 1 and {} days",
                MAX_INTERVAL_DAYS
            )));
        }
        if self.easy_bonus < 1.0 {
            return Err(invalid("easy_bonus must be at least 1.0"));
        }
        if self.hard_multiplier <= 0.0 {
            return Err(invalid("hard_multiplier must be positive"));
        }
        if !(0.0..=1.0).contains(&self.lapse_multiplier) {
            return Err(invalid("lapse_multiplier must be between 0.0 and 1.0"));
        }
        for (name, value) in [
            ("graduating_interval", self.graduating_interval),
            ("easy_interval", self.easy_interval),
            ("minimum_lapse_interval", self.minimum_lapse_interval),
        ] {
            if value < 1.0 {
                return Err(invalid(format!("{} must be at least 1 day", name)));
            }
            if value > self.maximum_interval {
                return Err(invalid(format!("{} exceeds maximum_interval", name)));
            }
        }

        Ok(())
    }
}

fn check_steps(name: &str, steps: &[u32]) -> Result<()> {
    if steps.is_empty() {
        return Err(invalid(format!("{} must not be empty", name)));
    }
    if steps.contains(&0) {
        return Err(invalid(format!("{} must be longer than zero minutes", name)));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> SchedulerError {
    SchedulerError::InvalidSettings(message.into())
}
