use crate::{ApiRequest, REFRESH_PATH, Transport};

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use pt_session::{SessionError, SessionRefresher, SessionResult, SessionStore};

/// Calls the refresh endpoint straight on the transport, outside the 401
/// interceptor, and saves the renewed cookies.
pub struct TransportRefresher {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl TransportRefresher {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { transport, store }
    }

    fn save_cookies(&self) {
        let result = self.store.load().and_then(|mut stored| {
            if stored.user.is_none() {
                return Ok(());
            }
            stored.cookies = self.transport.cookie_header();
            self.store.save(&stored)
        });

        if let Err(e) = result {
            warn!("Failed to save refreshed cookies: {e}");
        }
    }
}

#[async_trait]
impl SessionRefresher for TransportRefresher {
    async fn refresh(&self) -> SessionResult<()> {
        let response = self
            .transport
            .send(&ApiRequest::post(REFRESH_PATH))
            .await
            .map_err(|e| SessionError::refresh_failed(e.to_string()))?;

        if !response.is_success() {
            return Err(SessionError::refresh_failed(format!(
                "{REFRESH_PATH} returned status {}",
                response.status
            )));
        }

        self.save_cookies();
        Ok(())
    }
}
