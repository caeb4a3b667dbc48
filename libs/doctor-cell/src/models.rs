// libs/doctor-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::doctor::{DayOfWeek, SlotType, Specialty};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub specialty: Specialty,
    pub room_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotRequest {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub slot_type: SlotType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub specialty: Specialty,
    pub specialty_display: String,
    pub room_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_type: SlotType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    pub day: DayOfWeek,
    pub available: bool,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleResponse {
    pub doctor_id: Uuid,
    /// Monday-first; every weekday appears, configured or not.
    pub weekly_schedule: Vec<DayView>,
    pub working_days: u32,
}

/// One candidate date in the booking picker. Off days are shown but flagged,
/// so the caller can render "doctor unavailable" instead of hiding the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDate {
    pub date: NaiveDate,
    pub day: String,
    pub formatted: String,
    pub is_off: bool,
}

/// One date inside a reschedule/transfer window: only workable days with at
/// least one free time appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenDate {
    pub date: NaiveDate,
    pub day: String,
    pub formatted: String,
    pub times: Vec<NaiveTime>,
}

/// Times for a specific date. An off day is a distinguished result rather than
/// an empty list, so "doctor off" and "fully booked" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAvailability {
    OffDay,
    Times(Vec<NaiveTime>),
}

impl DayAvailability {
    pub fn is_off(&self) -> bool {
        matches!(self, DayAvailability::OffDay)
    }

    pub fn times(&self) -> &[NaiveTime] {
        match self {
            DayAvailability::OffDay => &[],
            DayAvailability::Times(times) => times,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Time slot not found")]
    SlotNotFound,

    #[error("Start time must be before end time")]
    InvalidRange,

    #[error("Slot overlaps an existing slot on {0}")]
    Overlap(DayOfWeek),
}
