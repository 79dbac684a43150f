//! Dated sessions derived from weekly templates, and the date ranges they
//! are expanded over.

use crate::ids::{ModuleId, ScheduleId, SpecialtyId, TeacherId};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use rollcall_core::serde::hh_mm;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Longest range, in days, a single expansion may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

/// One occurrence of a template on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub schedule_id: ScheduleId,
    pub module_id: ModuleId,
    pub module_code: String,
    pub module_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub specialty_id: SpecialtyId,
    pub classroom: Option<String>,
    pub group: Option<String>,
    pub date: NaiveDate,
    /// English weekday name of `date`, e.g. "Monday"
    pub day_name: String,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    /// `start_time` plus the configured session length
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:00")]
    pub end_time: NaiveTime,
    /// Whether any attendance was recorded for this template on this date
    pub attendance_taken: bool,
}

/// Sessions sharing one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySessions {
    pub date: NaiveDate,
    pub day_name: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    Inverted { from: NaiveDate, to: NaiveDate },
    TooLong { days: i64 },
}

impl RangeError {
    /// Request field the error is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Inverted { .. } => "from",
            Self::TooLong { .. } => "to",
        }
    }
}

impl std::error::Error for RangeError {}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted { from, to } => {
                write!(f, "from ({}) must not be after to ({})", from, to)
            }
            Self::TooLong { days } => write!(
                f,
                "date range spans {} days, the maximum is {}",
                days, MAX_RANGE_DAYS
            ),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted {
                from: start,
                to: end,
            });
        }
        let days = (end - start).num_days();
        if days > MAX_RANGE_DAYS {
            return Err(RangeError::TooLong { days });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// `[today, today + window_days]`.
    pub fn upcoming(today: NaiveDate, window_days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Range selection for session listings.
///
/// `date` wins over `from`/`to`; `from` and `to` only apply together.
/// Otherwise the default upcoming window is used.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionRangeQuery {
    /// A single day
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Narrow to one module
    pub module_id: Option<ModuleId>,
}

impl SessionRangeQuery {
    pub fn resolve(&self, today: NaiveDate, window_days: u32) -> Result<DateRange, RangeError> {
        if let Some(date) = self.date {
            return Ok(DateRange::single(date));
        }
        match (self.from, self.to) {
            (Some(from), Some(to)) => DateRange::new(from, to),
            _ => Ok(DateRange::upcoming(today, window_days)),
        }
    }
}

/// Which Monday..Sunday week to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeekSelector {
    #[default]
    Current,
    Next,
}

impl WeekSelector {
    pub fn range(self, today: NaiveDate) -> DateRange {
        let offset = u64::from(today.weekday().num_days_from_monday());
        let monday = today - Days::new(offset);
        let start = match self {
            Self::Current => monday,
            Self::Next => monday + Days::new(7),
        };
        DateRange {
            start,
            end: start + Days::new(6),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    /// `current` (default) or `next`
    #[serde(default)]
    pub week: WeekSelector,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherWeekResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentWeekResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DaySessions>,
}
