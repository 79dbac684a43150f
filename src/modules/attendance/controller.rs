use axum::{
    Json,
    extract::{Path, State},
};
use rollcall_core::AppError;
use rollcall_models::ids::{ScheduleId, StudentId, TeacherId};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    AttendanceHistoryQuery, PaginatedAttendanceHistory, PaginatedStudentAttendance, RosterQuery,
    RosterResponse, SaveAttendanceDto,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

/// Roster of a session
///
/// Students of the template's specialty and semester, each with the
/// attendance recorded for `date` (default: today) if any.
#[utoipa::path(
    get,
    path = "/api/teachers/{teacher_id}/sessions/{schedule_id}",
    summary = "Get session roster",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID"),
        ("schedule_id" = Uuid, Path, description = "Schedule template ID"),
        RosterQuery
    ),
    responses(
        (status = 200, description = "Roster", body = RosterResponse),
        (status = 403, description = "Template assigned to another teacher"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_session_roster(
    State(state): State<AppState>,
    Path((teacher_id, schedule_id)): Path<(Uuid, Uuid)>,
    ValidatedQuery(query): ValidatedQuery<RosterQuery>,
) -> Result<Json<RosterResponse>, AppError> {
    let date = query.date.unwrap_or_else(|| state.clock.today());
    let roster = AttendanceService::roster(
        &state.db,
        TeacherId::from(teacher_id),
        ScheduleId::from(schedule_id),
        date,
    )
    .await?;
    Ok(Json(roster))
}

/// Record attendance for a session
///
/// All lines are saved in one transaction. Submitting the same date again
/// updates the existing rows.
#[utoipa::path(
    post,
    path = "/api/teachers/{teacher_id}/sessions/{schedule_id}",
    summary = "Save session attendance",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID"),
        ("schedule_id" = Uuid, Path, description = "Schedule template ID")
    ),
    request_body = SaveAttendanceDto,
    responses(
        (status = 200, description = "Refreshed roster", body = RosterResponse),
        (status = 403, description = "Template assigned to another teacher"),
        (status = 404, description = "Schedule not found"),
        (status = 422, description = "Duplicate or unknown students, or date off the template's day")
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn save_session_attendance(
    State(state): State<AppState>,
    Path((teacher_id, schedule_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<SaveAttendanceDto>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = AttendanceService::save(
        &state.db,
        TeacherId::from(teacher_id),
        ScheduleId::from(schedule_id),
        dto,
        state.clock.now(),
    )
    .await?;
    Ok(Json(roster))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{teacher_id}/attendance/history",
    summary = "Teacher attendance history",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID"),
        AttendanceHistoryQuery
    ),
    responses(
        (status = 200, description = "Recorded sessions, newest first", body = PaginatedAttendanceHistory),
        (status = 422, description = "Invalid date range")
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_history(
    State(state): State<AppState>,
    Path(teacher_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<AttendanceHistoryQuery>,
) -> Result<Json<PaginatedAttendanceHistory>, AppError> {
    let history =
        AttendanceService::history(&state.db, TeacherId::from(teacher_id), query).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/attendance",
    summary = "Student attendance",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        AttendanceHistoryQuery
    ),
    responses(
        (status = 200, description = "Attendance rows, newest first", body = PaginatedStudentAttendance),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Invalid date range")
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<AttendanceHistoryQuery>,
) -> Result<Json<PaginatedStudentAttendance>, AppError> {
    let attendance =
        AttendanceService::student_attendance(&state.db, StudentId::from(student_id), query)
            .await?;
    Ok(Json(attendance))
}
