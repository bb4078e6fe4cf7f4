use crate::{ApiRequest, ApiResponse, CliClientResult, ClientError, Transport};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client as ReqwestClient, Url};

/// [`Transport`] over reqwest with an in-memory cookie jar.
pub struct ReqwestTransport {
    base_url: String,
    origin: Url,
    client: ReqwestClient,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Create a transport for `base_url`.
    ///
    /// `cookies` is a `Cookie` header value saved by an earlier run; each
    /// `name=value` pair is put back into the jar.
    pub fn new(base_url: &str, timeout: Duration, cookies: Option<&str>) -> CliClientResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url).map_err(|e| ClientError::invalid_url(&base_url, e.to_string()))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookies) = cookies {
            for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &origin);
            }
        }

        let client = ReqwestClient::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url,
            origin,
            client,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request, with its query string.
    pub fn url(&self, request: &ApiRequest) -> CliClientResult<Url> {
        let raw = format!("{}{}", self.base_url, request.path);
        let mut url = Url::parse(&raw).map_err(|e| ClientError::invalid_url(&raw, e.to_string()))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> CliClientResult<ApiResponse> {
        let url = self.url(request)?;
        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{} {} -> {}", request.method, request.path, status);
        Ok(ApiResponse { status, body })
    }

    fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(String::from))
    }
}
