// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/search", get(handlers::search_appointments))
        .route("/stats", get(handlers::appointment_stats))
        .route("/sweep-missed", post(handlers::sweep_missed_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/confirm", post(handlers::confirm_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .route(
            "/{appointment_id}/invalidate",
            post(handlers::invalidate_appointment),
        )
        .route(
            "/{appointment_id}/reschedule-options",
            get(handlers::reschedule_options),
        )
        .route(
            "/{appointment_id}/transfer-options",
            get(handlers::transfer_options),
        )
        .route(
            "/{appointment_id}/reschedule",
            post(handlers::reschedule_appointment),
        )
        .route(
            "/{appointment_id}/transfer",
            post(handlers::transfer_appointment),
        )
        .with_state(state)
}
