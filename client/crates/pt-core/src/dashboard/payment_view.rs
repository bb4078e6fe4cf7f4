use crate::dashboard::direction::Direction;
use crate::format::{CURRENCY_SYMBOL, format_inr};
use crate::relative_time::{format_full_date, format_relative_time};
use crate::{Payment, UserInfo};

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// One payment as the dashboard presents it to the current user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: String,
    pub direction: Direction,
    pub counterparty: String,
    pub amount: f64,
    pub amount_display: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub relative_time: String,
    pub full_date: String,
}

impl PaymentView {
    pub fn new<Tz>(payment: &Payment, user_id: &str, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let direction = Direction::of(payment, user_id);

        let (prefix, party, party_id) = match direction {
            Direction::Credit => ("From", payment.payer.as_ref(), &payment.payer_id),
            Direction::Debit => ("To", payment.payee.as_ref(), &payment.payee_id),
        };

        Self {
            id: payment.id.clone(),
            direction,
            counterparty: format!("{prefix}: {}", party_label(party, party_id)),
            amount: payment.amount,
            amount_display: format!(
                "{}{}{}",
                direction.sign(),
                CURRENCY_SYMBOL,
                format_inr(payment.amount)
            ),
            description: payment.description.clone(),
            category: payment.category.clone(),
            relative_time: format_relative_time(payment.timestamp, now),
            full_date: format_full_date(payment.timestamp, &now.timezone()),
        }
    }
}

fn party_label(party: Option<&UserInfo>, fallback_id: &str) -> String {
    match party {
        Some(info) if !info.name.trim().is_empty() => info.name.clone(),
        Some(info) if !info.email.trim().is_empty() => info.email.clone(),
        _ => fallback_id.to_string(),
    }
}
