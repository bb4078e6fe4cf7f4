use crate::SessionResult;

use async_trait::async_trait;

/// Performs the token refresh call against the backend.
#[async_trait]
pub trait SessionRefresher: Send + Sync {
    async fn refresh(&self) -> SessionResult<()>;
}
