//! Client-side views over the ledger list: stats, type filters, date ranges,
//! and the per-payment card projection.

pub mod dashboard_view;
pub mod date_range;
pub mod direction;
pub mod payment_view;
pub mod stats;
pub mod transaction_filter;

use crate::{Payment, TransactionFilter};

/// Select the payments matching `filter` from the current user's perspective.
pub fn filter_payments<'a>(
    payments: &'a [Payment],
    user_id: &str,
    filter: TransactionFilter,
) -> Vec<&'a Payment> {
    payments
        .iter()
        .filter(|p| match filter {
            TransactionFilter::All => true,
            TransactionFilter::Credit => p.payee_id == user_id,
            TransactionFilter::Debit => p.payer_id == user_id,
        })
        .collect()
}
