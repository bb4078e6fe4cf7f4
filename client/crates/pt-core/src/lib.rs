//! Domain types and client-side logic for the paytrack client: the DTOs the
//! backend exchanges, dashboard computations, relative-time labels, and the
//! checks the input forms apply.

pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;
pub mod relative_time;
pub mod validation;

#[cfg(test)]
mod tests;

pub use dashboard::dashboard_view::DashboardView;
pub use dashboard::date_range::{DateRange, QUICK_RANGE_DAYS};
pub use dashboard::direction::Direction;
pub use dashboard::filter_payments;
pub use dashboard::payment_view::PaymentView;
pub use dashboard::stats::DashboardStats;
pub use dashboard::transaction_filter::TransactionFilter;
pub use error::{CoreError, Result as CoreResult};
pub use format::{current_local_datetime, format_inr, local_datetime_to_utc};
pub use models::api_error::ApiErrorBody;
pub use models::auth::{
    LoginCredentials, LoginResponse, OtpRequest, OtpResponse, OtpVerifyRequest,
    PasswordResetRequest, PasswordResetVerifyRequest, RegisterRequest, SignupResponse,
};
pub use models::beneficiary::{Beneficiary, BeneficiaryEnrollRequest, BeneficiaryEnrollResponse};
pub use models::payment::{LedgerRecord, Payment, PaymentRequest};
pub use models::user::{User, UserInfo};
pub use relative_time::{
    JUST_NOW, RELATIVE_TIME_REFRESH_INTERVAL, format_full_date, format_relative_time,
};
pub use validation::beneficiary_form::build_enroll_request;
pub use validation::email::{is_valid_email, validate_email};
pub use validation::otp_input::{OTP_LENGTH, OtpInput, parse_otp, parse_otp_number, sanitize_otp};
pub use validation::password::{PasswordStrength, validate_password_confirmation};
pub use validation::payment_form::{PaymentForm, parse_amount};
