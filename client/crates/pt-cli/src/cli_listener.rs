use std::sync::Arc;

use log::warn;
use pt_core::User;
use pt_session::SessionListener;
use tokio::sync::Notify;

/// Stands in for the redirect to the login page: logs the expiry and wakes
/// whoever waits on [`CliSessionListener::expired`].
#[derive(Default)]
pub(crate) struct CliSessionListener {
    expired: Arc<Notify>,
}

impl CliSessionListener {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn expired(&self) -> Arc<Notify> {
        Arc::clone(&self.expired)
    }
}

impl SessionListener for CliSessionListener {
    fn session_expired(&self, user: Option<&User>) {
        match user {
            Some(user) => warn!("Session for {} expired, login required", user.email),
            None => warn!("Session expired, login required"),
        }
        // notify_one keeps a permit when nobody is waiting yet
        self.expired.notify_one();
    }
}
