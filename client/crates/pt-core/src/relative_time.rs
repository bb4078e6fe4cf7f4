//! Human labels for payment timestamps ("5 min ago", "Yesterday at 09:15 am").
//!
//! All functions take "now" explicitly so callers decide the clock and the
//! display time zone. Calendar comparisons ("same day", "yesterday") are made
//! in the time zone of `now`.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// How often a displayed label should be recomputed.
pub const RELATIVE_TIME_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub const JUST_NOW: &str = "Just now";

const TIME_OF_DAY_FORMAT: &str = "%I:%M %P";
const ABSOLUTE_FORMAT: &str = "%-d %b %Y, %I:%M %P";
const FULL_DATE_FORMAT: &str = "%A, %-d %B %Y at %I:%M:%S %P";

/// Format `timestamp` relative to `now`.
///
/// | age                         | label                      |
/// |-----------------------------|----------------------------|
/// | under a minute (or future)  | `Just now`                 |
/// | under an hour               | `N min ago`                |
/// | same calendar day           | `N hours ago`              |
/// | previous calendar day       | `Yesterday at hh:mm am`    |
/// | under seven days            | `N days ago`               |
/// | older                       | `5 Jan 2025, 03:45 pm`     |
pub fn format_relative_time<Tz>(timestamp: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    let elapsed = now.with_timezone(&Utc) - timestamp;

    if elapsed < TimeDelta::minutes(1) {
        return JUST_NOW.to_string();
    }

    if elapsed < TimeDelta::hours(1) {
        return format!("{} min ago", elapsed.num_minutes());
    }

    let today = now.date_naive();
    let day = local.date_naive();

    if day == today {
        return plural(elapsed.num_hours(), "hour");
    }

    if today.pred_opt() == Some(day) {
        return format!("Yesterday at {}", local.format(TIME_OF_DAY_FORMAT));
    }

    if elapsed < TimeDelta::days(7) {
        return plural(elapsed.num_days(), "day");
    }

    local.format(ABSOLUTE_FORMAT).to_string()
}

/// Long form used for tooltips and detail output.
pub fn format_full_date<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format(FULL_DATE_FORMAT)
        .to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
