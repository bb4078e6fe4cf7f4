use crate::{ApiRequest, ApiResponse, CliClientResult};

use async_trait::async_trait;

/// Sends requests to the backend and owns its cookies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`. Non-2xx statuses are returned as responses, only
    /// transport failures are errors.
    async fn send(&self, request: &ApiRequest) -> CliClientResult<ApiResponse>;

    /// Current `Cookie` header value for the API origin.
    fn cookie_header(&self) -> Option<String>;
}
