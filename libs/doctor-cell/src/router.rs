// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::register_doctor))
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}/schedule", get(handlers::get_schedule))
        .route("/{doctor_id}/schedule/slots", post(handlers::add_slot))
        .route(
            "/{doctor_id}/schedule/slots/{slot_id}",
            delete(handlers::remove_slot),
        )
        .route("/{doctor_id}/schedule/{day}/toggle", post(handlers::toggle_day))
        .route("/{doctor_id}/availability", get(handlers::get_availability))
        .with_state(state)
}
