use crate::User;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Signup verification sends the code as a string.
#[derive(Debug, Clone, Serialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtpResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password-reset verification sends the code as a number.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetVerifyRequest {
    pub email: String,
    pub otp: u32,
}
