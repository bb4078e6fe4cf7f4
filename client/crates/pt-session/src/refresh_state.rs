use std::fmt;

/// What the session manager is doing about the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh in flight
    Idle,
    /// Proactive refresh fired by the timer, or one asked for by the user
    Refreshing,
    /// Refresh triggered by a 401, the original request waits to be replayed
    Retrying,
}

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Proactive,
    Unauthorized,
    Manual,
}

impl RefreshTrigger {
    /// State the manager is in while a refresh with this trigger runs.
    pub fn state(&self) -> RefreshState {
        match self {
            Self::Proactive | Self::Manual => RefreshState::Refreshing,
            Self::Unauthorized => RefreshState::Retrying,
        }
    }
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proactive => f.write_str("proactive"),
            Self::Unauthorized => f.write_str("401-triggered"),
            Self::Manual => f.write_str("manual"),
        }
    }
}
