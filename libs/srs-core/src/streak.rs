//! Consecutive study-day streaks.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Run of consecutive days with at least one review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStreak {
    pub consecutive_days: u32,
    pub streak_start: Option<NaiveDate>,
    pub last_study_date: Option<NaiveDate>,
}

/// Streak ending today, or yesterday when nothing has been studied today yet.
///
/// Days after `today` are ignored. A broken streak reports zero days but
/// still carries the last study date.
pub fn current_streak(study_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> StudyStreak {
    let last_study_date = study_days.range(..=today).next_back().copied();
    let Some(last) = last_study_date else {
        return StudyStreak::default();
    };

    if last != today && today.pred_opt() != Some(last) {
        return StudyStreak {
            consecutive_days: 0,
            streak_start: None,
            last_study_date,
        };
    }

    let mut start = last;
    let mut consecutive_days = 1;
    while let Some(previous) = start.pred_opt() {
        if !study_days.contains(&previous) {
            break;
        }
        start = previous;
        consecutive_days += 1;
    }

    StudyStreak {
        consecutive_days,
        streak_start: Some(start),
        last_study_date,
    }
}
