// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::doctor::DayOfWeek;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{AddSlotRequest, AvailabilityQuery, RegisterDoctorRequest, ScheduleError};
use crate::services::calendar::CalendarService;
use crate::services::slots::SlotAllocator;

fn map_schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        ScheduleError::SlotNotFound => AppError::NotFound("Time slot not found".to_string()),
        ScheduleError::InvalidRange => {
            AppError::BadRequest("Start time must be before end time".to_string())
        }
        ScheduleError::Overlap(day) => {
            AppError::Conflict(format!("Slot overlaps an existing slot on {}", day))
        }
    }
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    let doctor = calendar.register_doctor(request).await;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor registered successfully"
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    let doctors = calendar.list_doctors().await;

    Ok(Json(json!({ "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    let schedule = calendar
        .get_schedule(doctor_id)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!(schedule)))
}

#[axum::debug_handler]
pub async fn add_slot(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<AddSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    let slot_id = calendar
        .add_slot(doctor_id, request)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "slot_id": slot_id,
        "message": "Time slot added successfully"
    })))
}

#[axum::debug_handler]
pub async fn remove_slot(
    State(state): State<Arc<AppState>>,
    Path((doctor_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    calendar
        .remove_slot(doctor_id, slot_id)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Time slot removed successfully"
    })))
}

#[axum::debug_handler]
pub async fn toggle_day(
    State(state): State<Arc<AppState>>,
    Path((doctor_id, day)): Path<(Uuid, DayOfWeek)>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarService::new(&state);
    let toggle = calendar
        .toggle_day(doctor_id, day)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "available": toggle.available,
        "invalidated_appointments": toggle.invalidated,
        "message": format!("{} availability updated", day)
    })))
}

/// With `?date=` returns the free times for that date (off days flagged, not
/// errors); without it returns the booking picker dates.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let allocator = SlotAllocator::new(&state);

    if let Some(date) = query.date {
        let availability = allocator
            .list_available_times(doctor_id, date)
            .await
            .map_err(map_schedule_error)?;

        return Ok(Json(json!({
            "date": date,
            "off_day": availability.is_off(),
            "available_times": availability.times()
        })));
    }

    let dates = allocator
        .list_available_dates(doctor_id)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "available_dates": dates
    })))
}
