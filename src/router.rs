use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use rollcall_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::modules::attendance::router::{
    init_student_attendance_router, init_teacher_attendance_router,
};
use crate::modules::registration_numbers::router::init_registration_numbers_router;
use crate::modules::registrations::router::{
    init_registrations_router, init_student_records_router,
};
use crate::modules::schedules::router::init_schedules_router;
use crate::modules::sessions::router::{
    init_student_sessions_router, init_teacher_sessions_router,
};
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
}

pub fn init_router(state: AppState) -> Router {
    let students = init_student_records_router()
        .merge(init_student_sessions_router())
        .merge(init_student_attendance_router());
    let teachers = init_teacher_sessions_router().merge(init_teacher_attendance_router());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/registration-numbers", init_registration_numbers_router())
                .nest("/registrations", init_registrations_router())
                .nest("/schedules", init_schedules_router())
                .nest("/students", students)
                .nest("/teachers", teachers),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
