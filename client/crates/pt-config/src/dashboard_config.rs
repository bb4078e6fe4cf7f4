use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_RELATIVE_TIME_TICK_SECS: u64 = 1;
pub const MAX_RELATIVE_TIME_TICK_SECS: u64 = 3600;
pub const DEFAULT_RELATIVE_TIME_TICK_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How often `dashboard --watch` recomputes relative time labels
    pub relative_time_tick_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            relative_time_tick_secs: DEFAULT_RELATIVE_TIME_TICK_SECS,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.relative_time_tick_secs < MIN_RELATIVE_TIME_TICK_SECS
            || self.relative_time_tick_secs > MAX_RELATIVE_TIME_TICK_SECS
        {
            return Err(ConfigError::dashboard(format!(
                "dashboard.relative_time_tick_secs must be {}-{}, got {}",
                MIN_RELATIVE_TIME_TICK_SECS,
                MAX_RELATIVE_TIME_TICK_SECS,
                self.relative_time_tick_secs
            )));
        }

        Ok(())
    }

    pub fn relative_time_tick(&self) -> Duration {
        Duration::from_secs(self.relative_time_tick_secs)
    }
}
