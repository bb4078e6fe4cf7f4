use crate::validation::email::validate_email;
use crate::{BeneficiaryEnrollRequest, CoreError, CoreResult};

pub const ALIAS_MIN_LENGTH: usize = 2;
pub const ALIAS_MAX_LENGTH: usize = 50;

/// Validate the add-beneficiary form and build the enroll request.
#[track_caller]
pub fn build_enroll_request(payee_email: &str, payee_alias: &str) -> CoreResult<BeneficiaryEnrollRequest> {
    let payee_email = payee_email.trim();
    let payee_alias = payee_alias.trim();

    validate_email(payee_email)?;

    let alias_length = payee_alias.chars().count();
    if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&alias_length) {
        return Err(CoreError::validation(format!(
            "Alias must be {ALIAS_MIN_LENGTH}-{ALIAS_MAX_LENGTH} characters, got {alias_length}"
        )));
    }

    Ok(BeneficiaryEnrollRequest {
        payee_email: payee_email.to_string(),
        payee_alias: payee_alias.to_string(),
    })
}
