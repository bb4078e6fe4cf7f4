use crate::{CoreError, CoreResult};

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Format of a local date-time as typed by a user (`2025-12-27T11:32`).
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format of the date-only query parameters sent to `/ledgers`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with Indian digit grouping (`12,34,567.5`).
///
/// Amounts are rounded to paise and trailing zero fraction digits are dropped.
pub fn format_inr(amount: f64) -> String {
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;

    let mut out = String::new();
    if amount < 0.0 && paise > 0 {
        out.push('-');
    }
    out.push_str(&group_indian(&rupees.to_string()));

    if fraction != 0 {
        let fraction = format!("{fraction:02}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Convert a local `YYYY-MM-DDTHH:MM` value to UTC.
///
/// An empty input means "now", matching what the payment form submits when
/// the user leaves the field untouched.
#[track_caller]
pub fn local_datetime_to_utc<Tz: TimeZone>(
    input: &str,
    tz: &Tz,
    now: DateTime<Utc>,
) -> CoreResult<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(now);
    }

    let naive = NaiveDateTime::parse_from_str(input, LOCAL_DATETIME_FORMAT).map_err(|e| {
        CoreError::invalid_date(input, format!("expected YYYY-MM-DDTHH:MM ({e})"))
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| CoreError::invalid_date(input, "time does not exist in local time zone"))
}

/// Render `now` in the local `YYYY-MM-DDTHH:MM` form (the payment form default).
pub fn current_local_datetime<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(LOCAL_DATETIME_FORMAT).to_string()
}
