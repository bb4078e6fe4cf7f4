use crate::app_error::{AppError, Result as AppResult};
use crate::output::to_value;

use pt_cli::Client;

use clap::Subcommand;
use serde_json::{Value, json};

#[derive(Subcommand)]
pub(crate) enum AuthCommands {
    /// Log in and cache the session
    Login {
        #[arg(long)]
        email: String,

        /// Password (read from PT_PASSWORD when not given)
        #[arg(long, env = "PT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Send a signup verification code
    SendOtp {
        #[arg(long)]
        email: String,
    },

    /// Verify a signup code
    VerifyOtp {
        #[arg(long)]
        email: String,

        /// 6-digit code; separators are ignored
        #[arg(long)]
        otp: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "PT_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Log out and forget the cached session
    Logout,

    /// Refresh the session now
    Refresh,

    /// Show the cached user
    Whoami,

    /// Request a password reset code
    ResetRequest {
        #[arg(long)]
        email: String,
    },

    /// Verify a password reset code
    ResetVerify {
        /// Defaults to the email of the last reset request
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        otp: String,
    },
}

impl AuthCommands {
    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            Self::Login { .. } => "Login failed",
            Self::SendOtp { .. } => "Failed to send OTP",
            Self::VerifyOtp { .. } => "Invalid OTP",
            Self::Signup { .. } => "Signup failed",
            Self::Logout => "Logout failed",
            Self::Refresh => "Failed to refresh session",
            Self::Whoami => "Not logged in",
            Self::ResetRequest { .. } => "Failed to send reset code",
            Self::ResetVerify { .. } => "Failed to verify reset code",
        }
    }

    pub(crate) async fn execute(self, client: &Client) -> AppResult<Value> {
        match self {
            Self::Login { email, password } => to_value(&client.login(&email, &password).await?),
            Self::SendOtp { email } => to_value(&client.send_signup_otp(&email).await?),
            Self::VerifyOtp { email, otp } => {
                to_value(&client.verify_signup_otp(&email, &otp).await?)
            }
            Self::Signup {
                name,
                email,
                password,
                confirm_password,
            } => to_value(
                &client
                    .signup(&name, &email, &password, &confirm_password)
                    .await?,
            ),
            Self::Logout => Ok(client.logout().await?),
            Self::Refresh => {
                client.refresh().await?;
                let next_refresh_at = client.session().next_refresh_at();
                Ok(json!({
                    "refreshed": true,
                    "nextRefreshAt": next_refresh_at,
                }))
            }
            Self::Whoami => {
                let user = client
                    .session()
                    .current_user()
                    .ok_or_else(AppError::not_logged_in)?;
                to_value(&user)
            }
            Self::ResetRequest { email } => {
                to_value(&client.request_password_reset(&email).await?)
            }
            Self::ResetVerify { email, otp } => to_value(
                &client
                    .verify_password_reset(email.as_deref(), &otp)
                    .await?,
            ),
        }
    }
}
