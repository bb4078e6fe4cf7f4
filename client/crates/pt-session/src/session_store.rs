use crate::SessionResult;

use chrono::{DateTime, Utc};
use pt_core::User;
use serde::{Deserialize, Serialize};

/// What survives between runs: the logged-in user, the auth cookies the
/// backend set, and the email of a password reset in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// `Cookie` header value for the API origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_email: Option<String>,
    /// When the code for `reset_email` was last requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.cookies.is_none() && self.reset_email.is_none()
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the stored session; a missing store yields the empty session.
    fn load(&self) -> SessionResult<StoredSession>;

    fn save(&self, session: &StoredSession) -> SessionResult<()>;

    fn clear(&self) -> SessionResult<()>;
}
