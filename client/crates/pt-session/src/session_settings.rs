use std::time::Duration;

use pt_config::SessionConfig;

/// Timing and policy knobs of a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Lifetime of a freshly issued access token
    pub refresh_interval: Duration,
    /// How long before expiry the proactive refresh fires
    pub refresh_lead: Duration,
    pub coalesce_refreshes: bool,
    /// Minimum gap between two reset code requests for the same email
    pub reset_resend_cooldown: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            refresh_lead: config.refresh_lead(),
            coalesce_refreshes: config.coalesce_refreshes,
            reset_resend_cooldown: config.reset_resend_cooldown(),
        }
    }
}
