use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rollcall_core::AppError;
use rollcall_models::ids::RegistrationNumberId;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::registration_numbers::model::{
    AvailableRegistrationNumber, BulkGenerateRegistrationNumbersDto,
    BulkGeneratedRegistrationNumbers, GenerateRegistrationNumberDto, GeneratedRegistrationNumber,
    RegistrationNumberFilterParams, UsedRegistrationNumber,
};
use crate::modules::registration_numbers::service::RegistrationNumberService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Issue the next registration number for a specialty
#[utoipa::path(
    post,
    path = "/api/registration-numbers",
    summary = "Generate registration number",
    request_body = GenerateRegistrationNumberDto,
    responses(
        (status = 201, description = "Number issued", body = GeneratedRegistrationNumber),
        (status = 400, description = "Number collision"),
        (status = 404, description = "Specialty not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Registration Numbers"
)]
#[instrument(skip(state))]
pub async fn generate_registration_number(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<GenerateRegistrationNumberDto>,
) -> Result<(StatusCode, Json<GeneratedRegistrationNumber>), AppError> {
    let generated =
        RegistrationNumberService::generate(&state.db, dto.specialty_id, state.clock.now())
            .await?;

    Ok((StatusCode::CREATED, Json(generated)))
}

/// Issue several consecutive registration numbers at once
#[utoipa::path(
    post,
    path = "/api/registration-numbers/bulk",
    summary = "Generate registration numbers in bulk",
    request_body = BulkGenerateRegistrationNumbersDto,
    responses(
        (status = 201, description = "Numbers issued", body = BulkGeneratedRegistrationNumbers),
        (status = 400, description = "Number collision"),
        (status = 404, description = "Specialty not found"),
        (status = 422, description = "Count out of range")
    ),
    tag = "Registration Numbers"
)]
#[instrument(skip(state))]
pub async fn generate_registration_numbers_bulk(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<BulkGenerateRegistrationNumbersDto>,
) -> Result<(StatusCode, Json<BulkGeneratedRegistrationNumbers>), AppError> {
    // Validated to 1..=500 above.
    let count = u32::try_from(dto.count).map_err(AppError::internal)?;
    let generated = RegistrationNumberService::generate_bulk(
        &state.db,
        dto.specialty_id,
        count,
        state.clock.now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(generated)))
}

#[utoipa::path(
    get,
    path = "/api/registration-numbers/available",
    summary = "List available registration numbers",
    params(RegistrationNumberFilterParams),
    responses(
        (status = 200, description = "Unused numbers ordered by number", body = Vec<AvailableRegistrationNumber>)
    ),
    tag = "Registration Numbers"
)]
#[instrument(skip(state))]
pub async fn list_available_registration_numbers(
    State(state): State<AppState>,
    Query(filters): Query<RegistrationNumberFilterParams>,
) -> Result<Json<Vec<AvailableRegistrationNumber>>, AppError> {
    let numbers = RegistrationNumberService::list_available(&state.db, filters).await?;
    Ok(Json(numbers))
}

#[utoipa::path(
    get,
    path = "/api/registration-numbers/used",
    summary = "List used registration numbers",
    params(RegistrationNumberFilterParams),
    responses(
        (status = 200, description = "Used numbers with their students, most recent first", body = Vec<UsedRegistrationNumber>)
    ),
    tag = "Registration Numbers"
)]
#[instrument(skip(state))]
pub async fn list_used_registration_numbers(
    State(state): State<AppState>,
    Query(filters): Query<RegistrationNumberFilterParams>,
) -> Result<Json<Vec<UsedRegistrationNumber>>, AppError> {
    let numbers = RegistrationNumberService::list_used(&state.db, filters).await?;
    Ok(Json(numbers))
}

/// Delete an unused registration number
#[utoipa::path(
    delete,
    path = "/api/registration-numbers/{id}",
    summary = "Delete registration number",
    params(
        ("id" = Uuid, Path, description = "Registration number ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Number is in use"),
        (status = 404, description = "Registration number not found")
    ),
    tag = "Registration Numbers"
)]
#[instrument(skip(state))]
pub async fn delete_registration_number(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    RegistrationNumberService::delete(&state.db, RegistrationNumberId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
