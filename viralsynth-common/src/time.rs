//! Timestamp and calendar-date utilities

use chrono::{DateTime, Duration, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as a `YYYY-MM-DD` calendar date (UTC)
pub fn format_date(at: DateTime<Utc>) -> String {
    at.date_naive().format("%Y-%m-%d").to_string()
}

/// First day of an inclusive lookback window ending today
///
/// `days = 1` is today, `days = 8` is one week ago. `days = 0` is treated as today.
pub fn lookback_date(now: DateTime<Utc>, days: u32) -> String {
    let offset = i64::from(days.saturating_sub(1));
    format_date(now - Duration::days(offset))
}
