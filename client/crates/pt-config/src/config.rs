use crate::{
    APP_DIR_NAME, ApiConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DashboardConfig, LoggingConfig, SessionConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for PT_CONFIG_DIR env var, else use `<platform config dir>/paytrack`
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply PT_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: PT_CONFIG_DIR env var > platform config dir (e.g. ~/.config/paytrack)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api.validate()?;
        self.session.validate()?;
        self.dashboard.validate()?;
        self.logging.validate()?;

        if self.logging.file.as_deref() == Some(self.session.file.as_str()) {
            return Err(ConfigError::config(format!(
                "logging.file and session.file must differ, both are {}",
                self.session.file
            )));
        }
        Ok(())
    }

    /// Absolute path of the session cache file.
    pub fn session_file_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.session.file))
    }

    /// Absolute path of the log file, if file logging is enabled.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => Ok(Some(Self::config_dir()?.join(file))),
            None => Ok(None),
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  api: {} (timeout {}s)",
            self.api.base_url, self.api.request_timeout_secs
        );
        info!(
            "  session: {} (refresh every {}s, {}s early, coalesce: {}, reset resend after {}s)",
            self.session.file,
            self.session.refresh_interval_secs,
            self.session.refresh_lead_secs,
            self.session.coalesce_refreshes,
            self.session.reset_resend_cooldown_secs
        );
        info!(
            "  dashboard: relative time tick {}s",
            self.dashboard.relative_time_tick_secs
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("none")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Api
        Self::apply_env_string("PT_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_parse(
            "PT_API_REQUEST_TIMEOUT_SECS",
            &mut self.api.request_timeout_secs,
        );

        // Session
        Self::apply_env_string("PT_SESSION_FILE", &mut self.session.file);
        Self::apply_env_parse(
            "PT_SESSION_REFRESH_INTERVAL_SECS",
            &mut self.session.refresh_interval_secs,
        );
        Self::apply_env_parse(
            "PT_SESSION_REFRESH_LEAD_SECS",
            &mut self.session.refresh_lead_secs,
        );
        Self::apply_env_bool(
            "PT_SESSION_COALESCE_REFRESHES",
            &mut self.session.coalesce_refreshes,
        );
        Self::apply_env_parse(
            "PT_SESSION_RESET_RESEND_COOLDOWN_SECS",
            &mut self.session.reset_resend_cooldown_secs,
        );

        // Dashboard
        Self::apply_env_parse(
            "PT_DASHBOARD_TICK_SECS",
            &mut self.dashboard.relative_time_tick_secs,
        );

        // Logging
        Self::apply_env_parse("PT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("PT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("PT_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
