use crate::Payment;

use serde::Serialize;

/// Which way a payment moved money relative to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// A payment is a credit when the user is its payee; anything else is
    /// shown as a debit.
    pub fn of(payment: &Payment, user_id: &str) -> Self {
        if payment.payee_id == user_id {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    pub fn sign(&self) -> char {
        match self {
            Self::Credit => '+',
            Self::Debit => '-',
        }
    }
}
