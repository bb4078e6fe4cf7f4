use crate::format::local_datetime_to_utc;
use crate::{Beneficiary, CoreError, CoreResult, PaymentRequest, User};

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

pub const MIN_AMOUNT: f64 = 0.01;

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(\.\d{0,2})?|\.\d{1,2})$").expect("amount pattern is a valid regex")
});

/// Parse a typed amount: a plain decimal of at least 0.01 with at most two
/// fraction digits.
#[track_caller]
pub fn parse_amount(raw: &str) -> CoreResult<f64> {
    let raw = raw.trim();
    if !AMOUNT_PATTERN.is_match(raw) {
        return Err(CoreError::validation(format!(
            "Amount must be a number with at most two decimals, got '{raw}'"
        )));
    }

    let amount: f64 = raw
        .parse()
        .map_err(|_| CoreError::validation(format!("Amount is not a number: '{raw}'")))?;

    if amount < MIN_AMOUNT {
        return Err(CoreError::validation(format!(
            "Amount must be at least {MIN_AMOUNT}"
        )));
    }

    Ok(amount)
}

/// What the send-payment form collects.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub amount: String,
    pub description: String,
    /// Local `YYYY-MM-DDTHH:MM`; `None` or empty means now.
    pub timestamp: Option<String>,
    pub category: Option<String>,
}

impl PaymentForm {
    /// Validate the form and build the ledger request paying `beneficiary`
    /// from `payer`.
    #[track_caller]
    pub fn into_request<Tz: TimeZone>(
        self,
        payer: &User,
        beneficiary: &Beneficiary,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> CoreResult<PaymentRequest> {
        let amount = parse_amount(&self.amount)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(CoreError::validation("Please enter a description"));
        }

        let timestamp = local_datetime_to_utc(self.timestamp.as_deref().unwrap_or(""), tz, now)?;
        if timestamp > now {
            return Err(CoreError::validation("Payment time cannot be in the future"));
        }

        Ok(PaymentRequest {
            payer_id: payer.id.clone(),
            payee_id: beneficiary.payee_ref(),
            amount,
            description: Some(description.to_string()),
            timestamp: Some(timestamp),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }
}
