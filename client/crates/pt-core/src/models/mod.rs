pub mod api_error;
pub mod auth;
pub mod beneficiary;
pub(crate) mod id;
pub mod payment;
pub mod user;
