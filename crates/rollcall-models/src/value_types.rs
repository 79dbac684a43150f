//! Enumerated domain values: schedule days, study modes and attendance
//! statuses, plus the configurable set of days templates may use.

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    InvalidDay(String),
    EmptyDaySet,
    InvalidStudyMode(String),
    InvalidAttendanceStatus(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDay(value) => write!(f, "Invalid day: {}", value),
            Self::EmptyDaySet => write!(f, "Day set must contain at least one day"),
            Self::InvalidStudyMode(value) => write!(f, "Invalid study mode: {}", value),
            Self::InvalidAttendanceStatus(value) => {
                write!(f, "Invalid attendance status: {}", value)
            }
        }
    }
}

// ============================================================================
// ScheduleDay
// ============================================================================

/// Day of the week a recurring template occurs on.
///
/// Names follow a fixed Monday..Sunday calendar regardless of locale.
/// Parsing is case-insensitive; serialization is lowercase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "schedule_day", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ScheduleDay {
    pub const ALL: [ScheduleDay; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
            Self::Saturday => Weekday::Sat,
            Self::Sunday => Weekday::Sun,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Capitalized English name, as shown in timetables.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for ScheduleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleDay {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| ValueTypeError::InvalidDay(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ScheduleDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DaySet
// ============================================================================

/// The days on which schedule templates may be created or edited.
///
/// Schema revisions disagree on whether the institute works Saturday to
/// Thursday or Monday to Saturday, so the set is configuration rather than a
/// constant. The default is the Saturday..Thursday week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySet(Vec<ScheduleDay>);

impl DaySet {
    pub fn new(days: impl IntoIterator<Item = ScheduleDay>) -> Result<Self, ValueTypeError> {
        let mut days: Vec<ScheduleDay> = days.into_iter().collect();
        days.sort();
        days.dedup();
        if days.is_empty() {
            return Err(ValueTypeError::EmptyDaySet);
        }
        Ok(Self(days))
    }

    pub fn all() -> Self {
        Self(ScheduleDay::ALL.to_vec())
    }

    pub fn contains(&self, day: ScheduleDay) -> bool {
        self.0.contains(&day)
    }

    pub fn days(&self) -> &[ScheduleDay] {
        &self.0
    }
}

impl Default for DaySet {
    fn default() -> Self {
        Self(vec![
            ScheduleDay::Monday,
            ScheduleDay::Tuesday,
            ScheduleDay::Wednesday,
            ScheduleDay::Thursday,
            ScheduleDay::Saturday,
            ScheduleDay::Sunday,
        ])
    }
}

impl FromStr for DaySet {
    type Err = ValueTypeError;

    /// Parses a comma-separated list such as `"saturday,sunday,monday"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ScheduleDay::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|day| day.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

// ============================================================================
// StudyMode
// ============================================================================

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "study_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    #[default]
    Initial,
    Alternance,
    Continue,
}

impl FromStr for StudyMode {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initial" => Ok(Self::Initial),
            "alternance" => Ok(Self::Alternance),
            "continue" => Ok(Self::Continue),
            _ => Err(ValueTypeError::InvalidStudyMode(s.to_string())),
        }
    }
}

// ============================================================================
// AttendanceStatus
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::Excused => "excused",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            "excused" => Ok(Self::Excused),
            _ => Err(ValueTypeError::InvalidAttendanceStatus(s.to_string())),
        }
    }
}
