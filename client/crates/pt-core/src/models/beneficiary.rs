use crate::models::id::option_string_or_number;

use serde::{Deserialize, Serialize};

/// A saved payee the user can send payments to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub id: i64,
    pub payee_email: String,
    pub payee_alias: String,
    #[serde(
        default,
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub payee_id: Option<String>,
}

impl Beneficiary {
    /// Identifier to use as `payeeId` when paying this beneficiary.
    ///
    /// Falls back to the beneficiary record id when the backend has not
    /// resolved the payee to a user yet.
    pub fn payee_ref(&self) -> String {
        self.payee_id
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryEnrollRequest {
    pub payee_email: String,
    pub payee_alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryEnrollResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Beneficiary>,
}
