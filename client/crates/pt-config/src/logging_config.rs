use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_COLORED, LogLevel};

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Colorize level names on stderr
    pub colored: bool,
    /// Optional log file, relative to the config directory
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: DEFAULT_LOG_COLORED,
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(file) = &self.file
            && (file.trim().is_empty() || Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a relative path without '..', got '{file}'"
            )));
        }

        Ok(())
    }
}
