//! Scheduling configuration.
//!
//! - `SCHEDULE_DAYS`: comma-separated days templates may be placed on
//!   (default: saturday..thursday)
//! - `SESSION_DURATION_MINUTES`: length of a derived session (default: 60)
//! - `SESSION_WINDOW_DAYS`: default upcoming window (default: 14)
//!
//! Invalid values are logged and replaced by the default.

use std::env;

use chrono::TimeDelta;
use rollcall_models::DaySet;

const DEFAULT_SESSION_MINUTES: i64 = 60;
const DEFAULT_WINDOW_DAYS: u32 = 14;
const MAX_SESSION_MINUTES: i64 = 24 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub days: DaySet,
    pub session_duration: TimeDelta,
    pub window_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: DaySet::default(),
            session_duration: TimeDelta::minutes(DEFAULT_SESSION_MINUTES),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl ScheduleConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("SCHEDULE_DAYS").ok().as_deref(),
            env::var("SESSION_DURATION_MINUTES").ok().as_deref(),
            env::var("SESSION_WINDOW_DAYS").ok().as_deref(),
        )
    }

    pub fn from_values(days: Option<&str>, minutes: Option<&str>, window: Option<&str>) -> Self {
        let defaults = Self::default();

        let days = match days {
            Some(raw) => raw.parse::<DaySet>().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Invalid SCHEDULE_DAYS, using default");
                defaults.days.clone()
            }),
            None => defaults.days.clone(),
        };

        let session_duration = match minutes {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(m) if (1..=MAX_SESSION_MINUTES).contains(&m) => TimeDelta::minutes(m),
                _ => {
                    tracing::warn!(value = %raw, "Invalid SESSION_DURATION_MINUTES, using default");
                    defaults.session_duration
                }
            },
            None => defaults.session_duration,
        };

        let window_days = match window {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid SESSION_WINDOW_DAYS, using default");
                defaults.window_days
            }),
            None => defaults.window_days,
        };

        Self {
            days,
            session_duration,
            window_days,
        }
    }
}
