use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_attendance_history, get_session_roster, get_student_attendance, save_session_attendance,
};

/// Routes under /teachers: GET/POST /{teacher_id}/sessions/{schedule_id},
/// GET /{teacher_id}/attendance/history
pub fn init_teacher_attendance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{teacher_id}/sessions/{schedule_id}",
            get(get_session_roster).post(save_session_attendance),
        )
        .route("/{teacher_id}/attendance/history", get(get_attendance_history))
}

/// Routes under /students: GET /{student_id}/attendance
pub fn init_student_attendance_router() -> Router<AppState> {
    Router::new().route("/{student_id}/attendance", get(get_student_attendance))
}
