//! Input checks the forms performed before anything reached the backend.

pub mod beneficiary_form;
pub mod email;
pub mod otp_input;
pub mod password;
pub mod payment_form;
