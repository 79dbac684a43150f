//! Attendance records, rosters and history views.

use crate::ids::{AttendanceId, ModuleId, ScheduleId, StudentId, TeacherId};
use crate::schedules::ScheduleWithDetails;
use crate::value_types::{AttendanceStatus, ScheduleDay};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rollcall_core::serde::hh_mm;
use rollcall_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// One student's status for one template on one date.
///
/// Unique per (student_id, schedule_id, attendance_date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub schedule_id: ScheduleId,
    pub teacher_id: TeacherId,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student expected at a session, with whatever was recorded for them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub registration_number: String,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    pub attendance_id: Option<AttendanceId>,
    /// `null` until attendance is taken
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResponse {
    pub schedule: ScheduleWithDetails,
    pub date: NaiveDate,
    pub attendance_taken: bool,
    pub students: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RosterQuery {
    /// Session date (default: today)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttendanceLine {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Batch save for one session date. Resubmitting updates rows in place.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveAttendanceDto {
    pub date: NaiveDate,
    #[validate(
        length(min = 1, message = "attendances must not be empty"),
        nested
    )]
    pub attendances: Vec<AttendanceLine>,
}

impl SaveAttendanceDto {
    /// Student ids listed more than once, in first-repeat order.
    pub fn duplicate_students(&self) -> Vec<StudentId> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for line in &self.attendances {
            if !seen.insert(line.student_id) && !duplicates.contains(&line.student_id) {
                duplicates.push(line.student_id);
            }
        }
        duplicates
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceHistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub module_id: Option<ModuleId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// One recorded session of a teacher, with per-status counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceHistoryEntry {
    pub schedule_id: ScheduleId,
    pub attendance_date: NaiveDate,
    pub module_id: ModuleId,
    pub module_name: String,
    pub day: ScheduleDay,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    pub classroom: Option<String>,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAttendanceHistory {
    pub data: Vec<AttendanceHistoryEntry>,
    pub meta: PaginationMeta,
}

/// A student's own attendance row with session details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentAttendanceRecord {
    pub id: AttendanceId,
    pub schedule_id: ScheduleId,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub module_id: ModuleId,
    pub module_code: String,
    pub module_name: String,
    pub teacher_name: String,
    pub day: ScheduleDay,
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_time: NaiveTime,
    pub classroom: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedStudentAttendance {
    pub data: Vec<StudentAttendanceRecord>,
    pub meta: PaginationMeta,
}
