use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    delete_registration_number, generate_registration_number, generate_registration_numbers_bulk,
    list_available_registration_numbers, list_used_registration_numbers,
};

/// Routes: POST /, POST /bulk, GET /available, GET /used, DELETE /{id}
pub fn init_registration_numbers_router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_registration_number))
        .route("/bulk", post(generate_registration_numbers_bulk))
        .route("/available", get(list_available_registration_numbers))
        .route("/used", get(list_used_registration_numbers))
        .route("/{id}", delete(delete_registration_number))
}
