use crate::{CoreError, CoreResult};

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

const INVALID_OTP_MESSAGE: &str = "Please enter a valid 6-digit OTP";

/// Keep only the ASCII digits of `raw`.
pub fn sanitize_otp(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a complete code, tolerating separators such as spaces or dashes.
#[track_caller]
pub fn parse_otp(raw: &str) -> CoreResult<String> {
    let digits = sanitize_otp(raw);
    if digits.len() == OTP_LENGTH {
        Ok(digits)
    } else {
        Err(CoreError::validation(INVALID_OTP_MESSAGE))
    }
}

/// Parse a complete code into the number the password reset endpoint takes.
#[track_caller]
pub fn parse_otp_number(raw: &str) -> CoreResult<u32> {
    parse_otp(raw)?
        .parse()
        .map_err(|_| CoreError::validation(INVALID_OTP_MESSAGE))
}

/// State of an OTP entry field.
///
/// Non-digits are stripped on every update, an update that would exceed
/// [`OTP_LENGTH`] digits is ignored, and submission is only possible with
/// exactly [`OTP_LENGTH`] digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    value: String,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply newly typed field contents. Returns `false` if the update was
    /// rejected and the previous value kept.
    pub fn update(&mut self, raw: &str) -> bool {
        let digits = sanitize_otp(raw);
        if digits.len() > OTP_LENGTH {
            return false;
        }
        self.value = digits;
        true
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn can_submit(&self) -> bool {
        self.value.len() == OTP_LENGTH
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// The code, if complete.
    #[track_caller]
    pub fn code(&self) -> CoreResult<&str> {
        if self.can_submit() {
            Ok(&self.value)
        } else {
            Err(CoreError::validation(INVALID_OTP_MESSAGE))
        }
    }

    /// The code as a number, for endpoints that expect a numeric OTP.
    #[track_caller]
    pub fn as_number(&self) -> CoreResult<u32> {
        parse_otp_number(self.code()?)
    }
}
