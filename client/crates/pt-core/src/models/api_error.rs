use std::collections::HashMap;

use serde::Deserialize;

/// Error payload the backend returns on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl ApiErrorBody {
    /// The message, if the backend sent a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
