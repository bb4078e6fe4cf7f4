use crate::Clock;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Drives periodic re-rendering of relative time labels.
///
/// The first `tick` returns immediately, later ticks wait one period each.
pub struct RelativeTimeTicker {
    clock: Arc<dyn Clock>,
    period: Duration,
    started: bool,
}

impl RelativeTimeTicker {
    pub fn new(clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            clock,
            period,
            started: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick and return the clock reading to render against.
    pub async fn tick(&mut self) -> DateTime<Utc> {
        if self.started {
            self.clock.sleep(self.period).await;
        } else {
            self.started = true;
        }
        self.clock.now()
    }
}
