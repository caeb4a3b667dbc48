// libs/shared/models/src/appointment.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Missed,
    NeedsRescheduling,
}

impl AppointmentStatus {
    /// Active appointments hold their (doctor, date, time) slot.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::Missed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Missed => "missed",
            AppointmentStatus::NeedsRescheduling => "needs_rescheduling",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
    #[serde(rename = "consultation")]
    Consultation,
    #[serde(rename = "follow-up")]
    FollowUp,
    #[serde(rename = "check-up")]
    CheckUp,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppointmentType::Consultation => "consultation",
            AppointmentType::FollowUp => "follow-up",
            AppointmentType::CheckUp => "check-up",
        };
        write!(f, "{}", name)
    }
}

/// Events that drive the appointment state machine. Transitions are encoded
/// in one place (`AppointmentStatus::apply`) instead of scattered conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Confirm,
    Complete,
    Cancel,
    MarkMissed,
    Invalidate,
    /// The appointment is being replaced by a reschedule or transfer.
    Supersede,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::Confirm => "confirm",
            LifecycleEvent::Complete => "complete",
            LifecycleEvent::Cancel => "cancel",
            LifecycleEvent::MarkMissed => "mark_missed",
            LifecycleEvent::Invalidate => "invalidate",
            LifecycleEvent::Supersede => "supersede",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("cannot {event} an appointment in status {from}")]
pub struct TransitionError {
    pub from: AppointmentStatus,
    pub event: LifecycleEvent,
}

impl AppointmentStatus {
    /// The transition table. Terminal states accept no events.
    pub fn apply(self, event: LifecycleEvent) -> Result<AppointmentStatus, TransitionError> {
        use AppointmentStatus::*;
        use LifecycleEvent::*;

        let next = match (self, event) {
            (Pending, Confirm) => Confirmed,
            (Pending | Confirmed, Complete) => Completed,
            (Pending | Confirmed | NeedsRescheduling, Cancel) => Cancelled,
            (Pending | Confirmed, MarkMissed) => Missed,
            (Pending | Confirmed, Invalidate) => NeedsRescheduling,
            // A superseded appointment ends up cancelled; the audit chain lives
            // in the supersedes/superseded_by links, not in a separate status.
            (Pending | Confirmed | NeedsRescheduling, Supersede) => Cancelled,
            (from, event) => return Err(TransitionError { from, event }),
        };
        Ok(next)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub reason: String,
    pub status: AppointmentStatus,
    pub location: Option<String>,
    /// Appointment this record replaced (set on reschedule/transfer results).
    pub supersedes: Option<Uuid>,
    /// Appointment that replaced this record.
    pub superseded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
