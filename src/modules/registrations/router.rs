use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    approve_registration, delete_student, list_pending_registrations, register_student,
    reject_registration,
};

/// Routes: POST /, GET /pending, POST /{student_id}/approve, POST /{student_id}/reject
pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_student))
        .route("/pending", get(list_pending_registrations))
        .route("/{student_id}/approve", post(approve_registration))
        .route("/{student_id}/reject", post(reject_registration))
}

/// Routes under /students: DELETE /{student_id}
pub fn init_student_records_router() -> Router<AppState> {
    Router::new().route("/{student_id}", delete(delete_student))
}
