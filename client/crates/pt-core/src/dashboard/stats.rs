use crate::Payment;

use serde::Serialize;

/// Totals shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub credits: f64,
    pub debits: f64,
    pub balance: f64,
}

impl DashboardStats {
    /// Sum credits (user is payee) and debits (user is payer).
    ///
    /// A payment the user made to themselves counts on both sides.
    pub fn from_payments(payments: &[Payment], user_id: &str) -> Self {
        let credits: f64 = payments
            .iter()
            .filter(|p| p.payee_id == user_id)
            .map(|p| p.amount)
            .sum();

        let debits: f64 = payments
            .iter()
            .filter(|p| p.payer_id == user_id)
            .map(|p| p.amount)
            .sum();

        Self {
            credits,
            debits,
            balance: credits - debits,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.balance < 0.0
    }
}
