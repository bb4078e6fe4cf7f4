use crate::{CoreError, CoreResult};

use serde::Serialize;

const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// Score a password. Returns `None` for an empty password.
    ///
    /// One point each for: length >= 8, length >= 12, mixed case, a digit,
    /// a symbol. 0-2 is weak, 3-4 medium, 5 strong.
    pub fn evaluate(password: &str) -> Option<Self> {
        if password.is_empty() {
            return None;
        }

        let length = password.chars().count();
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

        let score = [
            length >= 8,
            length >= 12,
            has_lower && has_upper,
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| SYMBOLS.contains(c)),
        ]
        .into_iter()
        .filter(|point| *point)
        .count();

        Some(match score {
            0..=2 => Self::Weak,
            3..=4 => Self::Medium,
            _ => Self::Strong,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

#[track_caller]
pub fn validate_password_confirmation(password: &str, confirm: &str) -> CoreResult<()> {
    if password == confirm {
        Ok(())
    } else {
        Err(CoreError::validation("Passwords do not match"))
    }
}
