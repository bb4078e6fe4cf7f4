use crate::{CliClientResult, ClientError};

use pt_core::ApiErrorBody;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A request to the backend, independent of the HTTP stack that sends it.
///
/// Requests are plain data so the client can replay one after a token
/// refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> CliClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Status and raw body of a backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Turn a non-2xx response into [`ClientError::Api`], picking up the
    /// backend's `message` when the body carries one.
    #[track_caller]
    pub fn error_for_status(self) -> CliClientResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let message = serde_json::from_str::<ApiErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.message().map(String::from));

        Err(ClientError::api_error(self.status, message))
    }

    #[track_caller]
    pub fn json<T: DeserializeOwned>(&self) -> CliClientResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The body as JSON, `null` when empty and a JSON string when it is not
    /// JSON at all.
    pub fn json_value(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}
