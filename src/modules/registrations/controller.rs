use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollcall_core::AppError;
use rollcall_models::ids::StudentId;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::registrations::model::{RegisterStudentDto, Student, StudentWithSpecialty};
use crate::modules::registrations::service::RegistrationService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a student with an issued registration number
#[utoipa::path(
    post,
    path = "/api/registrations",
    summary = "Register student",
    request_body = RegisterStudentDto,
    responses(
        (status = 201, description = "Student registered, pending approval", body = Student),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Unknown, foreign or already used registration number, or invalid fields")
    ),
    tag = "Registrations"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = RegistrationService::register(&state.db, dto, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/registrations/pending",
    summary = "List pending registrations",
    responses(
        (status = 200, description = "Unapproved students, oldest first", body = Vec<StudentWithSpecialty>)
    ),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn list_pending_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithSpecialty>>, AppError> {
    let students = RegistrationService::pending(&state.db).await?;
    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/registrations/{student_id}/approve",
    summary = "Approve registration",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Registration approved", body = Student),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Already approved")
    ),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn approve_registration(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = RegistrationService::approve(&state.db, StudentId::from(student_id)).await?;
    Ok(Json(student))
}

/// Reject a pending registration and release its number
#[utoipa::path(
    post,
    path = "/api/registrations/{student_id}/reject",
    summary = "Reject registration",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Registration rejected, number released"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Registration already approved")
    ),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn reject_registration(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    RegistrationService::reject(&state.db, StudentId::from(student_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a student and release their registration number
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}",
    summary = "Delete student",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted, number released"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    RegistrationService::delete_student(&state.db, StudentId::from(student_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
