use crate::app_error::{AppError, Result as AppResult};

use serde::Serialize;
use serde_json::Value;

/// Writes command results to stdout as JSON.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pretty: bool,
}

impl Output {
    pub(crate) fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Print `value`. `null` prints nothing.
    pub(crate) fn print(&self, value: &Value) -> AppResult<()> {
        if value.is_null() {
            return Ok(());
        }

        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .map_err(|e| AppError::output(format!("Error serializing response: {e}")))?;

        println!("{json}");
        Ok(())
    }
}

/// Convert a response type into the JSON printed for it.
pub(crate) fn to_value<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::output(format!("Error serializing response: {e}")))
}
