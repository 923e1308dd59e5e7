//! Human-facing timestamps for batch summaries and topic listings.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStyle {
    /// `刚刚`, `5分钟前`, ... falling back to the date after a week.
    #[default]
    Relative,
    /// `YYYY-MM-DD HH:MM:SS`
    Full,
    /// `YYYY-MM-DD`
    Date,
}

/// Formats `at` relative to `now`, rendered in `at`'s own timezone.
///
/// Timestamps in the future count as `刚刚`.
pub fn format_time<Tz>(at: &DateTime<Tz>, now: DateTime<Utc>, style: TimeStyle) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match style {
        TimeStyle::Date => at.format("%Y-%m-%d").to_string(),
        TimeStyle::Full => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        TimeStyle::Relative => {
            let seconds = (now - at.with_timezone(&Utc)).num_seconds();
            let minutes = seconds / 60;
            let hours = minutes / 60;
            let days = hours / 24;

            if seconds < 60 {
                "刚刚".to_string()
            } else if minutes < 60 {
                format!("{minutes}分钟前")
            } else if hours < 24 {
                format!("{hours}小时前")
            } else if days < 7 {
                format!("{days}天前")
            } else {
                at.format("%Y-%m-%d").to_string()
            }
        }
    }
}
