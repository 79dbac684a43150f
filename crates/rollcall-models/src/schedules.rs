//! Weekly schedule templates.
//!
//! A template is a recurring weekly commitment: one module taught by one
//! teacher to one specialty (optionally one student group) on a given day
//! and time slot. Concrete dated sessions are derived from templates and
//! never stored.

use crate::ids::{ModuleId, ScheduleId, SpecialtyId, TeacherId};
use crate::value_types::{ScheduleDay, StudyMode};
use chrono::{DateTime, NaiveTime, Utc};
use rollcall_core::serde::{hh_mm, nullable};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: ScheduleId,
    pub module_id: ModuleId,
    pub teacher_id: TeacherId,
    pub specialty_id: SpecialtyId,
    pub day: ScheduleDay,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:30")]
    pub end_time: NaiveTime,
    pub classroom: Option<String>,
    pub semester: i32,
    pub academic_year: String,
    /// Student group; `null` means the whole specialty
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    pub study_mode: StudyMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Template joined with module, teacher and specialty names.
///
/// This is also the input of session expansion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScheduleWithDetails {
    pub id: ScheduleId,
    pub module_id: ModuleId,
    pub module_code: String,
    pub module_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub day: ScheduleDay,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:30")]
    pub end_time: NaiveTime,
    pub classroom: Option<String>,
    pub semester: i32,
    pub academic_year: String,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    pub study_mode: StudyMode,
}

/// The fields of a template that conflict detection looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub specialty_id: SpecialtyId,
    pub academic_year: String,
    pub day: ScheduleDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub group: Option<String>,
}

impl From<&Schedule> for SlotCandidate {
    fn from(schedule: &Schedule) -> Self {
        Self {
            specialty_id: schedule.specialty_id,
            academic_year: schedule.academic_year.clone(),
            day: schedule.day,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            group: schedule.group.clone(),
        }
    }
}

/// `YYYY-YYYY` where the second year follows the first.
pub fn validate_academic_year(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .split_once('-')
        .filter(|(first, second)| first.len() == 4 && second.len() == 4)
        .and_then(|(first, second)| {
            Some((first.parse::<i32>().ok()?, second.parse::<i32>().ok()?))
        })
        .is_some_and(|(first, second)| second == first + 1);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("academic_year")
            .with_message("academic_year must look like 2025-2026".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    pub module_id: ModuleId,
    pub teacher_id: TeacherId,
    pub specialty_id: SpecialtyId,
    /// Day name, case-insensitive
    pub day: ScheduleDay,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    /// Must be later than `start_time`
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:30")]
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 50))]
    pub classroom: Option<String>,
    #[validate(range(min = 1, max = 12, message = "semester must be between 1 and 12"))]
    pub semester: i32,
    #[validate(custom(function = "validate_academic_year"))]
    pub academic_year: String,
    #[validate(length(min = 1, max = 20))]
    pub group: Option<String>,
    #[serde(default)]
    pub study_mode: StudyMode,
}

/// Partial update. `classroom` and `group` distinguish "absent" (keep) from
/// `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    pub module_id: Option<ModuleId>,
    pub teacher_id: Option<TeacherId>,
    pub specialty_id: Option<SpecialtyId>,
    pub day: Option<ScheduleDay>,
    #[serde(default, with = "rollcall_core::serde::option_hh_mm")]
    #[schema(value_type = Option<String>, example = "08:00")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "rollcall_core::serde::option_hh_mm")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(min = 1, max = 50))]
    #[schema(value_type = Option<String>)]
    pub classroom: Option<Option<String>>,
    #[validate(range(min = 1, max = 12, message = "semester must be between 1 and 12"))]
    pub semester: Option<i32>,
    #[validate(custom(function = "validate_academic_year"))]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(min = 1, max = 20))]
    #[schema(value_type = Option<String>)]
    pub group: Option<Option<String>>,
    pub study_mode: Option<StudyMode>,
}

impl UpdateScheduleDto {
    /// Applies the present fields on top of `current`.
    pub fn apply_to(&self, current: &Schedule) -> Schedule {
        let mut merged = current.clone();
        if let Some(module_id) = self.module_id {
            merged.module_id = module_id;
        }
        if let Some(teacher_id) = self.teacher_id {
            merged.teacher_id = teacher_id;
        }
        if let Some(specialty_id) = self.specialty_id {
            merged.specialty_id = specialty_id;
        }
        if let Some(day) = self.day {
            merged.day = day;
        }
        if let Some(start_time) = self.start_time {
            merged.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            merged.end_time = end_time;
        }
        if let Some(classroom) = &self.classroom {
            merged.classroom = classroom.clone();
        }
        if let Some(semester) = self.semester {
            merged.semester = semester;
        }
        if let Some(academic_year) = &self.academic_year {
            merged.academic_year = academic_year.clone();
        }
        if let Some(group) = &self.group {
            merged.group = group.clone();
        }
        if let Some(study_mode) = self.study_mode {
            merged.study_mode = study_mode;
        }
        merged
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleFilterParams {
    pub specialty_id: Option<SpecialtyId>,
    pub teacher_id: Option<TeacherId>,
    pub group: Option<String>,
    pub day: Option<ScheduleDay>,
    pub academic_year: Option<String>,
    pub semester: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupsQuery {
    pub specialty_id: SpecialtyId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupsResponse {
    pub groups: Vec<String>,
}
