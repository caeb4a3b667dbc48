// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, LifecycleEvent};
use shared_store::{AppState, ScheduleStore};

use crate::models::{AppointmentError, CancelRequest};

/// Drives the appointment state machine. Every transition goes through
/// `AppointmentStatus::apply`, so an illegal move surfaces as a
/// `TransitionError` instead of silently writing a bad status.
pub struct LifecycleService {
    store: ScheduleStore,
    config: AppConfig,
}

impl LifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    async fn transition(
        &self,
        id: Uuid,
        event: LifecycleEvent,
    ) -> Result<Appointment, AppointmentError> {
        let mut state = self.store.write().await;
        let apt = state.appointment_mut(id).ok_or(AppointmentError::NotFound)?;

        apt.status = apt.status.apply(event)?;
        apt.updated_at = Utc::now();
        info!("Appointment {} {} -> {}", id, event, apt.status);
        Ok(apt.clone())
    }

    pub async fn confirm(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(id, LifecycleEvent::Confirm).await
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        request: CancelRequest,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.transition(id, LifecycleEvent::Cancel).await?;
        info!(
            "Appointment {} cancelled by {} ({})",
            id,
            request.cancelled_by.as_deref().unwrap_or("patient"),
            request.reason.as_deref().unwrap_or("no reason given")
        );
        Ok(appointment)
    }

    /// Completion is only meaningful once the appointment day has arrived.
    pub async fn complete(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let mut state = self.store.write().await;
        let apt = state.appointment_mut(id).ok_or(AppointmentError::NotFound)?;

        if Utc::now().date_naive() < apt.date {
            return Err(AppointmentError::NotYetDue);
        }

        apt.status = apt.status.apply(LifecycleEvent::Complete)?;
        apt.updated_at = Utc::now();
        info!("Appointment {} completed", id);
        Ok(apt.clone())
    }

    /// System transition into `needs_rescheduling`. Used when a doctor's day
    /// goes off or staff flags a conflict; the appointment is never
    /// auto-cancelled.
    pub async fn invalidate(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(id, LifecycleEvent::Invalidate).await
    }

    /// Sweep active appointments whose start is more than the grace period in
    /// the past and mark them missed. Returns the ids that flipped.
    pub async fn mark_overdue_missed(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        let grace = Duration::hours(self.config.missed_grace_hours as i64);
        let cutoff = now.naive_utc() - grace;

        let mut state = self.store.write().await;
        let mut missed = Vec::new();
        for apt in state.appointments_mut() {
            if apt.is_active() && apt.scheduled_at() < cutoff {
                if let Ok(next) = apt.status.apply(LifecycleEvent::MarkMissed) {
                    apt.status = next;
                    apt.updated_at = now;
                    missed.push(apt.id);
                }
            }
        }

        if !missed.is_empty() {
            info!("Marked {} overdue appointment(s) as missed", missed.len());
        }
        missed
    }
}
