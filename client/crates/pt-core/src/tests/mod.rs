
use crate::{Payment, UserInfo};

use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub(crate) fn payment(id: &str, payer: &str, payee: &str, amount: f64) -> Payment {
    Payment {
        id: id.to_string(),
        payer_id: payer.to_string(),
        payee_id: payee.to_string(),
        amount,
        timestamp: utc(2025, 6, 15, 9, 0, 0),
        description: format!("payment {id}"),
        category: None,
        payer: None,
        payee: None,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn user_info(id: &str, name: &str, email: &str) -> UserInfo {
    UserInfo {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}
