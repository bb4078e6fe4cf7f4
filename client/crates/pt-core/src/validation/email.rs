use crate::{CoreError, CoreResult};

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[track_caller]
pub fn validate_email(email: &str) -> CoreResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(CoreError::validation("Please enter a valid email address"))
    }
}
