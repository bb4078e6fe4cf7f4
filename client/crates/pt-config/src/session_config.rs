use crate::{ConfigError, ConfigErrorResult, DEFAULT_SESSION_FILE};

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

// Refresh interval constraints
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 120;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

// Lead time constraints
pub const MAX_REFRESH_LEAD_SECS: u64 = 300;
pub const DEFAULT_REFRESH_LEAD_SECS: u64 = 60;

pub const DEFAULT_COALESCE_REFRESHES: bool = false;

// Password reset resend cooldown constraints
pub const MAX_RESET_RESEND_COOLDOWN_SECS: u64 = 600;
pub const DEFAULT_RESET_RESEND_COOLDOWN_SECS: u64 = 60;

/// Session persistence and token refresh timing.
///
/// The backend issues access tokens valid for `refresh_interval_secs`; the
/// proactive timer fires `refresh_lead_secs` before that.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session cache file, relative to the config directory
    pub file: String,
    pub refresh_interval_secs: u64,
    pub refresh_lead_secs: u64,
    /// Let a refresh that finds another one in flight reuse its outcome
    pub coalesce_refreshes: bool,
    /// Minimum gap between two reset code requests for the same email
    pub reset_resend_cooldown_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: String::from(DEFAULT_SESSION_FILE),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            refresh_lead_secs: DEFAULT_REFRESH_LEAD_SECS,
            coalesce_refreshes: DEFAULT_COALESCE_REFRESHES,
            reset_resend_cooldown_secs: DEFAULT_RESET_RESEND_COOLDOWN_SECS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.refresh_interval_secs < MIN_REFRESH_INTERVAL_SECS
            || self.refresh_interval_secs > MAX_REFRESH_INTERVAL_SECS
        {
            return Err(ConfigError::session(format!(
                "session.refresh_interval_secs must be {}-{}, got {}",
                MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS, self.refresh_interval_secs
            )));
        }

        if self.refresh_lead_secs > MAX_REFRESH_LEAD_SECS {
            return Err(ConfigError::session(format!(
                "session.refresh_lead_secs must be 0-{}, got {}",
                MAX_REFRESH_LEAD_SECS, self.refresh_lead_secs
            )));
        }

        if self.refresh_lead_secs >= self.refresh_interval_secs {
            return Err(ConfigError::session(format!(
                "session.refresh_lead_secs ({}) must be less than session.refresh_interval_secs ({})",
                self.refresh_lead_secs, self.refresh_interval_secs
            )));
        }

        if self.reset_resend_cooldown_secs > MAX_RESET_RESEND_COOLDOWN_SECS {
            return Err(ConfigError::session(format!(
                "session.reset_resend_cooldown_secs must be 0-{}, got {}",
                MAX_RESET_RESEND_COOLDOWN_SECS, self.reset_resend_cooldown_secs
            )));
        }

        let path = Path::new(&self.file);
        if self.file.trim().is_empty() || path.is_absolute() || self.file.contains("..") {
            return Err(ConfigError::session(
                "session.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn refresh_lead(&self) -> Duration {
        Duration::from_secs(self.refresh_lead_secs)
    }

    pub fn reset_resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.reset_resend_cooldown_secs)
    }
}
