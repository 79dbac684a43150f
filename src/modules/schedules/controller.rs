use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rollcall_core::AppError;
use rollcall_models::ids::ScheduleId;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::schedules::model::{
    CreateScheduleDto, GroupsQuery, GroupsResponse, ScheduleFilterParams, ScheduleWithDetails,
    UpdateScheduleDto,
};
use crate::modules::schedules::service::ScheduleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/schedules",
    summary = "List schedule templates",
    params(ScheduleFilterParams),
    responses(
        (status = 200, description = "Templates ordered by day and start time", body = Vec<ScheduleWithDetails>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(filters): Query<ScheduleFilterParams>,
) -> Result<Json<Vec<ScheduleWithDetails>>, AppError> {
    let schedules = ScheduleService::list(&state.db, filters).await?;
    Ok(Json(schedules))
}

/// Create a weekly template
///
/// Rejected with 422 when it overlaps another template of the same
/// specialty, academic year and day whose group collides with it.
#[utoipa::path(
    post,
    path = "/api/schedules",
    summary = "Create schedule template",
    request_body = CreateScheduleDto,
    responses(
        (status = 201, description = "Template created", body = ScheduleWithDetails),
        (status = 404, description = "Module, teacher or specialty not found"),
        (status = 422, description = "Invalid day or times, or schedule conflict")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn create_schedule(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<(StatusCode, Json<ScheduleWithDetails>), AppError> {
    let schedule = ScheduleService::create(&state.db, &state.schedule_config.days, dto).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    get,
    path = "/api/schedules/groups",
    summary = "List student groups of a specialty",
    params(GroupsQuery),
    responses(
        (status = 200, description = "Distinct groups", body = GroupsResponse)
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn list_schedule_groups(
    State(state): State<AppState>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<GroupsResponse>, AppError> {
    let groups = ScheduleService::groups(&state.db, query.specialty_id).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/schedules/{id}",
    summary = "Get schedule template",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Template", body = ScheduleWithDetails),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleWithDetails>, AppError> {
    let schedule = ScheduleService::get(&state.db, ScheduleId::from(id)).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    summary = "Update schedule template",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Template updated", body = ScheduleWithDetails),
        (status = 404, description = "Schedule or a referenced record not found"),
        (status = 422, description = "Invalid day or times, or schedule conflict")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<ScheduleWithDetails>, AppError> {
    let schedule = ScheduleService::update(
        &state.db,
        &state.schedule_config.days,
        ScheduleId::from(id),
        dto,
    )
    .await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    summary = "Delete schedule template",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete(&state.db, ScheduleId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
