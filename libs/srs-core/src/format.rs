//! Compact, human-readable interval labels ("10m", "4d", "1.5y").

use crate::types::MINUTES_PER_DAY;

/// Format an interval in days for display next to a grade button.
pub fn format_interval(days: f64) -> String {
    if !days.is_finite() || days <= 0.0 {
        return "now".to_string();
    }

    let minutes = days * MINUTES_PER_DAY;
    if minutes < 59.5 {
        format!("{}m", minutes.round().max(1.0))
    } else if minutes < MINUTES_PER_DAY - 30.0 {
        format!("{}h", (minutes / 60.0).round())
    } else if days < 30.0 {
        format!("{}d", days.round())
    } else if days < 365.0 {
        format!("{}mo", one_decimal(days / 30.0))
    } else {
        format!("{}y", one_decimal(days / 365.0))
    }
}

fn one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}
