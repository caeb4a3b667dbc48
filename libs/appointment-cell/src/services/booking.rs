// libs/appointment-cell/src/services/booking.rs
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::services::slots::day_times;
use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_store::{AppState, ScheduleStore};

use crate::models::{AppointmentError, BookAppointmentRequest, SearchQuery};

const DEFAULT_SEARCH_LIMIT: usize = 50;

pub struct BookingService {
    store: ScheduleStore,
    config: AppConfig,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    /// Book a slot. The availability check and the insert happen under the same
    /// write guard, so two bookings racing for one slot serialize and the loser
    /// sees the winner's appointment.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let today = Utc::now().date_naive();
        if request.date <= today {
            return Err(AppointmentError::PastDate);
        }

        let mut state = self.store.write().await;
        let doctor = state
            .doctor(request.doctor_id)
            .filter(|d| d.is_active)
            .ok_or(AppointmentError::DoctorNotFound)?;

        let availability = day_times(
            &state,
            doctor,
            request.date,
            self.config.slot_interval_minutes,
        );
        if availability.is_off() {
            return Err(AppointmentError::OffDay);
        }
        if !availability.times().contains(&request.time) {
            return Err(AppointmentError::SlotUnavailable);
        }

        let location = doctor
            .room_location
            .clone()
            .unwrap_or_else(|| self.config.default_location.clone());

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            appointment_type: request.appointment_type,
            reason: request.reason,
            status: AppointmentStatus::Pending,
            location: Some(location),
            supersedes: None,
            superseded_by: None,
            created_at: now,
            updated_at: now,
        };
        state.insert_appointment(appointment.clone());

        info!(
            "Booked appointment {} for patient {} with doctor {} on {} {}",
            appointment.id, appointment.patient_id, appointment.doctor_id,
            appointment.date, appointment.time
        );
        Ok(appointment)
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let state = self.store.read().await;
        state
            .appointment(id)
            .cloned()
            .ok_or(AppointmentError::NotFound)
    }

    /// Filtered listing ordered by (date, time), paged with limit/offset.
    pub async fn search(&self, query: SearchQuery) -> Vec<Appointment> {
        let state = self.store.read().await;
        let mut results: Vec<Appointment> = state
            .appointments()
            .filter(|apt| query.patient_id.map_or(true, |p| apt.patient_id == p))
            .filter(|apt| query.doctor_id.map_or(true, |d| apt.doctor_id == d))
            .filter(|apt| query.status.map_or(true, |s| apt.status == s))
            .filter(|apt| query.from.map_or(true, |from| apt.date >= from))
            .filter(|apt| query.to.map_or(true, |to| apt.date <= to))
            .cloned()
            .collect();

        results.sort_by_key(|apt| (apt.date, apt.time));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        debug!("Search matched {} appointment(s)", results.len());
        results.into_iter().skip(offset).take(limit).collect()
    }
}
