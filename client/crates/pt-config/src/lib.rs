mod api_config;
mod config;
mod dashboard_config;
mod error;
mod log_level;
mod logging_config;
mod session_config;

#[cfg(test)]
mod tests;

pub use api_config::ApiConfig;
pub use config::Config;
pub use dashboard_config::DashboardConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use session_config::SessionConfig;

pub const CONFIG_DIR_ENV: &str = "PT_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "paytrack";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SESSION_FILE: &str = "session.json";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
const DEFAULT_LOG_COLORED: bool = true;
