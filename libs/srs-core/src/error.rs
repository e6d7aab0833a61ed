//! Error types for srs-core.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using SchedulerError.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur while scheduling a review.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    #[error("invalid grade: {0:?} (expected Again, Hard, Good or Easy)")]
    InvalidGrade(String),

    #[error("review at {reviewed_at} precedes last review at {last_reviewed_at}")]
    NonMonotonicReview {
        reviewed_at: DateTime<Utc>,
        last_reviewed_at: DateTime<Utc>,
    },

    #[error("invalid card state: {0}")]
    InvalidState(String),

    #[error("invalid scheduler settings: {0}")]
    InvalidSettings(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_invalid_grade() {
        let error = SchedulerError::InvalidGrade("Perfect".to_string());
        assert_eq!(
            error.to_string(),
            "invalid grade: \"Perfect\" (expected Again, Hard, Good or Easy)"
        );
    }

    #[test]
    fn display_non_monotonic_review() {
        let error = SchedulerError::NonMonotonicReview {
            reviewed_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            last_reviewed_at: Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "review at 2026-03-01 08:00:00 UTC precedes last review at 2026-03-02 08:00:00 UTC"
        );
    }
}
