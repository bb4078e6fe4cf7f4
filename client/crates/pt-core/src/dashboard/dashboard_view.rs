use crate::dashboard::filter_payments;
use crate::dashboard::payment_view::PaymentView;
use crate::{DashboardStats, DateRange, Payment, TransactionFilter, User};

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Everything the dashboard shows for one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting: String,
    pub filter: TransactionFilter,
    pub date_range: DateRange,
    /// Computed over the whole fetched list, not just the filtered cards.
    pub stats: DashboardStats,
    pub payments: Vec<PaymentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl DashboardView {
    pub fn build<Tz>(
        payments: &[Payment],
        user: &User,
        filter: TransactionFilter,
        date_range: DateRange,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let cards: Vec<PaymentView> = filter_payments(payments, &user.id, filter)
            .into_iter()
            .map(|p| PaymentView::new(p, &user.id, now))
            .collect();

        let empty_message = cards.is_empty().then(|| filter.empty_message());

        let name = if user.name.trim().is_empty() {
            "User"
        } else {
            user.name.as_str()
        };

        Self {
            greeting: format!("Welcome back, {name}!"),
            filter,
            date_range,
            stats: DashboardStats::from_payments(payments, &user.id),
            payments: cards,
            empty_message,
        }
    }
}
