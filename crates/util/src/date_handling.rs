//! # Date Handling Utilities
//!
//! Formatting helpers for the timestamps shown next to job runs and log
//! streams. The display format mirrors a medium localized date with a 12-hour
//! clock, for example `Sep 4, 2024 8:30 PM`.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// `strftime` pattern used for every user-facing timestamp.
pub const LOCALIZED_DATE_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Format a timestamp in its own time zone.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use gluetty_util::date_handling::format_localized;
///
/// let at = Utc.with_ymd_and_hms(2024, 9, 4, 20, 30, 0).unwrap();
/// assert_eq!(format_localized(&at), "Sep 4, 2024 8:30 PM");
/// ```
pub fn format_localized<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(LOCALIZED_DATE_FORMAT).to_string()
}

/// Format a UTC timestamp in the machine's local time zone.
pub fn format_local(at: DateTime<Utc>) -> String {
    format_localized(&at.with_timezone(&Local))
}

/// Render a run duration compactly (`45s`, `3m 07s`, `1h 02m 03s`).
pub fn format_duration_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
