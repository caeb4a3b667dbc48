// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    AppointmentError, BookAppointmentRequest, CancelRequest, RescheduleRequest, SearchQuery,
    StatsQuery, TransferRequest,
};
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleService;
use crate::services::resolver::ResolverService;
use crate::services::stats::StatsService;

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::PastDate => {
            AppError::BadRequest("Appointment date must be in the future".to_string())
        }
        AppointmentError::OffDay => {
            AppError::Conflict("Doctor is not available on that day".to_string())
        }
        AppointmentError::SlotUnavailable => {
            AppError::Conflict("That time slot is no longer available".to_string())
        }
        AppointmentError::NotYetDue => AppError::BadRequest(
            "Appointment cannot be completed before its scheduled date".to_string(),
        ),
        AppointmentError::SpecialtyMismatch => {
            AppError::BadRequest("Target doctor has a different specialty".to_string())
        }
        AppointmentError::SameDoctor => {
            AppError::BadRequest("Transfer target must be a different doctor".to_string())
        }
        AppointmentError::Transition(t) => AppError::BadRequest(t.to_string()),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state);
    let appointment = booking.book(request).await.map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state);
    let appointment = booking
        .get(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let booking = BookingService::new(&state);
    let appointments = booking.search(query).await;

    Ok(Json(json!({
        "count": appointments.len(),
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(&state);
    let appointment = lifecycle
        .confirm(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment confirmed"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    request: Option<Json<CancelRequest>>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(&state);
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let appointment = lifecycle
        .cancel(appointment_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(&state);
    let appointment = lifecycle
        .complete(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment completed"
    })))
}

#[axum::debug_handler]
pub async fn invalidate_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(&state);
    let appointment = lifecycle
        .invalidate(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment marked as needing rescheduling"
    })))
}

#[axum::debug_handler]
pub async fn sweep_missed_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = LifecycleService::new(&state);
    let missed = lifecycle.mark_overdue_missed(Utc::now()).await;

    Ok(Json(json!({
        "success": true,
        "missed_appointments": missed
    })))
}

#[axum::debug_handler]
pub async fn reschedule_options(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let resolver = ResolverService::new(&state);
    let options = resolver
        .reschedule_options(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(options)))
}

#[axum::debug_handler]
pub async fn transfer_options(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let resolver = ResolverService::new(&state);
    let options = resolver
        .transfer_options(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(options)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let resolver = ResolverService::new(&state);
    let appointment = resolver
        .reschedule(appointment_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment rescheduled successfully"
    })))
}

#[axum::debug_handler]
pub async fn transfer_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<Value>, AppError> {
    let resolver = ResolverService::new(&state);
    let appointment = resolver
        .transfer(appointment_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment transferred successfully"
    })))
}

#[axum::debug_handler]
pub async fn appointment_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let stats = StatsService::new(&state);
    let stats = stats.compute_stats(query).await;

    Ok(Json(json!(stats)))
}
