use axum::{
    Json,
    extract::{Path, State},
};
use rollcall_core::AppError;
use rollcall_models::ids::{StudentId, TeacherId};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::sessions::model::{
    SessionRangeQuery, SessionsResponse, StudentWeekResponse, TeacherWeekResponse, WeekQuery,
};
use crate::modules::sessions::service::SessionService;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

/// List a teacher's sessions
///
/// Defaults to the upcoming window starting today. `date` selects a single
/// day; `from` and `to` together select an explicit range.
#[utoipa::path(
    get,
    path = "/api/teachers/{teacher_id}/sessions",
    summary = "List teacher sessions",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID"),
        SessionRangeQuery
    ),
    responses(
        (status = 200, description = "Sessions ordered by date and start time", body = SessionsResponse),
        (status = 404, description = "Teacher not found"),
        (status = 422, description = "Invalid date range")
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn list_teacher_sessions(
    State(state): State<AppState>,
    Path(teacher_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<SessionRangeQuery>,
) -> Result<Json<SessionsResponse>, AppError> {
    let sessions = SessionService::teacher_upcoming(
        &state.db,
        &state.schedule_config,
        TeacherId::from(teacher_id),
        query,
        state.clock.today(),
    )
    .await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{teacher_id}/schedule",
    summary = "Teacher week view",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID"),
        WeekQuery
    ),
    responses(
        (status = 200, description = "Sessions of the selected Monday..Sunday week", body = TeacherWeekResponse),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn get_teacher_week(
    State(state): State<AppState>,
    Path(teacher_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<WeekQuery>,
) -> Result<Json<TeacherWeekResponse>, AppError> {
    let week = SessionService::teacher_week(
        &state.db,
        &state.schedule_config,
        TeacherId::from(teacher_id),
        query.week,
        state.clock.today(),
    )
    .await?;
    Ok(Json(week))
}

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/schedule",
    summary = "Student week view",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        WeekQuery
    ),
    responses(
        (status = 200, description = "Sessions of the selected week grouped by date", body = StudentWeekResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn get_student_week(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<WeekQuery>,
) -> Result<Json<StudentWeekResponse>, AppError> {
    let week = SessionService::student_week(
        &state.db,
        &state.schedule_config,
        StudentId::from(student_id),
        query.week,
        state.clock.today(),
    )
    .await?;
    Ok(Json(week))
}
