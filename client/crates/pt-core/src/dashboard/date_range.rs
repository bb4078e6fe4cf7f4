use crate::format::DATE_FORMAT;
use crate::{CoreError, CoreResult};

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Quick presets offered next to the custom range.
pub const QUICK_RANGE_DAYS: [u64; 3] = [7, 30, 90];

/// Optional server-side date bounds for `GET /ledgers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// No bounds: fetch everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// `[today - days, today]`.
    pub fn last_days(days: u64, today: NaiveDate) -> Self {
        Self {
            start: today.checked_sub_days(Days::new(days)),
            end: Some(today),
        }
    }

    /// One of the [`QUICK_RANGE_DAYS`] presets.
    #[track_caller]
    pub fn quick(days: u64, today: NaiveDate) -> CoreResult<Self> {
        if !QUICK_RANGE_DAYS.contains(&days) {
            return Err(CoreError::validation(format!(
                "Quick range must be one of {QUICK_RANGE_DAYS:?} days, use a custom range for {days}"
            )));
        }
        Ok(Self::last_days(days, today))
    }

    /// Build a custom range from the two date inputs.
    ///
    /// Both ends are required, `start` may not be after `end`, and `end` may
    /// not be after `today`.
    #[track_caller]
    pub fn custom(start: &str, end: &str, today: NaiveDate) -> CoreResult<Self> {
        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(CoreError::validation(
                "Both start and end dates are required",
            ));
        }

        let start = parse_date(start)?;
        let end = parse_date(end)?;

        if start > end {
            return Err(CoreError::validation(format!(
                "Start date {start} is after end date {end}"
            )));
        }

        if end > today {
            return Err(CoreError::validation(format!(
                "End date {end} is in the future"
            )));
        }

        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    pub fn is_all(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Query parameters, omitting absent bounds.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            params.push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        params
    }
}

#[track_caller]
fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| CoreError::invalid_date(value, format!("expected YYYY-MM-DD ({e})")))
}
