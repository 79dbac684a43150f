use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_schedule, delete_schedule, get_schedule, list_schedule_groups, list_schedules,
    update_schedule,
};

/// Routes: GET/POST /, GET /groups, GET/PUT/DELETE /{id}
pub fn init_schedules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route("/groups", get(list_schedule_groups))
        .route(
            "/{id}",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}
