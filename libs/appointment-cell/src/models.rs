// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::OpenDate;
use shared_models::appointment::{AppointmentStatus, AppointmentType, TransitionError};
use shared_models::doctor::Specialty;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelRequest {
    pub cancelled_by: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsScope {
    Patient,
    Doctor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    pub scope_id: Uuid,
    pub scope_type: StatsScope,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: u32,
    pub pending: u32,
    pub confirmed: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub missed: u32,
    pub needs_rescheduling: u32,
    /// Active appointments whose start is still in the future.
    pub upcoming: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleOptionsResponse {
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub current_date: NaiveDate,
    pub current_time: NaiveTime,
    pub available_dates: Vec<OpenDate>,
}

/// A same-specialty candidate for a transfer. `same_time_available` means the
/// doctor is free at the original appointment's exact date and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeDoctor {
    pub id: Uuid,
    pub name: String,
    pub room_location: Option<String>,
    pub same_time_available: bool,
    pub times_on_date: Vec<NaiveTime>,
    pub available_dates: Vec<OpenDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOptionsResponse {
    pub appointment_id: Uuid,
    pub specialty: Specialty,
    pub original_date: NaiveDate,
    pub original_time: NaiveTime,
    pub alternative_doctors: Vec<AlternativeDoctor>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment date must be in the future")]
    PastDate,

    #[error("Doctor is not available on that day")]
    OffDay,

    #[error("That time slot is no longer available")]
    SlotUnavailable,

    #[error("Appointment cannot be completed before its scheduled date")]
    NotYetDue,

    #[error("Target doctor has a different specialty")]
    SpecialtyMismatch,

    #[error("Transfer target must be a different doctor")]
    SameDoctor,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
