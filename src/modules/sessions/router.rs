use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_student_week, get_teacher_week, list_teacher_sessions};

/// Routes under /teachers: GET /{teacher_id}/sessions, GET /{teacher_id}/schedule
pub fn init_teacher_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/{teacher_id}/sessions", get(list_teacher_sessions))
        .route("/{teacher_id}/schedule", get(get_teacher_week))
}

/// Routes under /students: GET /{student_id}/schedule
pub fn init_student_sessions_router() -> Router<AppState> {
    Router::new().route("/{student_id}/schedule", get(get_student_week))
}
