use std::sync::Arc;

use rollcall_config::{CorsConfig, ScheduleConfig};
use rollcall_core::{Clock, SystemClock};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub schedule_config: ScheduleConfig,
    /// Source of "now" for year derivation, default ranges and week bounds
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State with configuration read from the environment and the wall clock.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            cors_config: CorsConfig::from_env(),
            schedule_config: ScheduleConfig::from_env(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}
