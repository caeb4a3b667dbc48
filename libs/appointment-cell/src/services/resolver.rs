// libs/appointment-cell/src/services/resolver.rs
//
// Recovery flow for appointments knocked out by calendar changes. A reschedule
// or transfer never edits the original record in place: it closes the original
// (cancelled, `superseded_by` set) and creates a replacement carrying
// `supersedes`, so the history stays traversable in both directions.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use doctor_cell::services::slots::{day_times, open_dates, slot_start_times};
use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentStatus, LifecycleEvent};
use shared_models::doctor::DayOfWeek;
use shared_store::{AppState, ScheduleStore};

use crate::models::{
    AlternativeDoctor, AppointmentError, RescheduleOptionsResponse, RescheduleRequest,
    TransferOptionsResponse, TransferRequest,
};

pub struct ResolverService {
    store: ScheduleStore,
    config: AppConfig,
}

impl ResolverService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    /// Same-doctor alternatives inside the reschedule window.
    pub async fn reschedule_options(
        &self,
        id: Uuid,
    ) -> Result<RescheduleOptionsResponse, AppointmentError> {
        let state = self.store.read().await;
        let apt = state.appointment(id).ok_or(AppointmentError::NotFound)?;
        apt.status.apply(LifecycleEvent::Supersede)?;

        let doctor = state
            .doctor(apt.doctor_id)
            .filter(|d| d.is_active)
            .ok_or(AppointmentError::DoctorNotFound)?;

        let today = Utc::now().date_naive();
        let available_dates = open_dates(
            &state,
            doctor,
            today,
            self.config.reschedule_window_days,
            self.config.slot_interval_minutes,
        );

        Ok(RescheduleOptionsResponse {
            appointment_id: apt.id,
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            current_date: apt.date,
            current_time: apt.time,
            available_dates,
        })
    }

    /// Same-specialty doctors who could take the appointment instead. A doctor
    /// off on the original weekday still appears when they have openings on
    /// other days inside the window.
    pub async fn transfer_options(
        &self,
        id: Uuid,
    ) -> Result<TransferOptionsResponse, AppointmentError> {
        let state = self.store.read().await;
        let apt = state.appointment(id).ok_or(AppointmentError::NotFound)?;
        apt.status.apply(LifecycleEvent::Supersede)?;

        let original_doctor = state
            .doctor(apt.doctor_id)
            .ok_or(AppointmentError::DoctorNotFound)?;
        let specialty = original_doctor.specialty;

        let today = Utc::now().date_naive();
        let mut alternative_doctors: Vec<AlternativeDoctor> = state
            .doctors()
            .filter(|d| d.is_active && d.specialty == specialty && d.id != apt.doctor_id)
            .map(|doctor| {
                let on_date = day_times(&state, doctor, apt.date, self.config.slot_interval_minutes);
                let times_on_date = on_date.times().to_vec();
                AlternativeDoctor {
                    id: doctor.id,
                    name: doctor.name.clone(),
                    room_location: doctor.room_location.clone(),
                    same_time_available: times_on_date.contains(&apt.time),
                    times_on_date,
                    available_dates: open_dates(
                        &state,
                        doctor,
                        today,
                        self.config.reschedule_window_days,
                        self.config.slot_interval_minutes,
                    ),
                }
            })
            .collect();
        alternative_doctors.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(TransferOptionsResponse {
            appointment_id: apt.id,
            specialty,
            original_date: apt.date,
            original_time: apt.time,
            alternative_doctors,
        })
    }

    pub async fn reschedule(
        &self,
        id: Uuid,
        request: RescheduleRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.commit_supersede(id, None, request.date, request.time)
            .await
    }

    pub async fn transfer(
        &self,
        id: Uuid,
        request: TransferRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.commit_supersede(id, Some(request.doctor_id), request.date, request.time)
            .await
    }

    /// The supersede transaction. Target slot is re-validated under the write
    /// guard; on a race loss the caller gets `SlotUnavailable` and the original
    /// record is untouched.
    async fn commit_supersede(
        &self,
        id: Uuid,
        target_doctor: Option<Uuid>,
        date: chrono::NaiveDate,
        time: chrono::NaiveTime,
    ) -> Result<Appointment, AppointmentError> {
        let today = Utc::now().date_naive();
        if date <= today {
            return Err(AppointmentError::PastDate);
        }

        let mut state = self.store.write().await;
        let original = state
            .appointment(id)
            .cloned()
            .ok_or(AppointmentError::NotFound)?;
        let closed_status = original.status.apply(LifecycleEvent::Supersede)?;

        // A transfer moves the patient to a different doctor; same-doctor
        // moves go through reschedule.
        if target_doctor == Some(original.doctor_id) {
            return Err(AppointmentError::SameDoctor);
        }

        let doctor_id = target_doctor.unwrap_or(original.doctor_id);
        let doctor = state
            .doctor(doctor_id)
            .filter(|d| d.is_active)
            .ok_or(AppointmentError::DoctorNotFound)?;

        if target_doctor.is_some() {
            let original_doctor = state
                .doctor(original.doctor_id)
                .ok_or(AppointmentError::DoctorNotFound)?;
            if doctor.specialty != original_doctor.specialty {
                return Err(AppointmentError::SpecialtyMismatch);
            }
        }

        let day = DayOfWeek::from_date(date);
        if !doctor.schedule.is_workable(day) {
            return Err(AppointmentError::OffDay);
        }
        let starts = slot_start_times(
            doctor.schedule.slots_for(day),
            self.config.slot_interval_minutes,
        );
        if !starts.contains(&time) {
            return Err(AppointmentError::SlotUnavailable);
        }
        // The original may hold this very slot; it is about to release it.
        if state.slot_taken(doctor_id, date, time, Some(id)) {
            return Err(AppointmentError::SlotUnavailable);
        }

        let location = doctor
            .room_location
            .clone()
            .unwrap_or_else(|| self.config.default_location.clone());

        let now = Utc::now();
        let replacement = Appointment {
            id: Uuid::new_v4(),
            patient_id: original.patient_id,
            doctor_id,
            date,
            time,
            appointment_type: original.appointment_type,
            reason: original.reason.clone(),
            status: AppointmentStatus::Confirmed,
            location: Some(location),
            supersedes: Some(id),
            superseded_by: None,
            created_at: now,
            updated_at: now,
        };

        if let Some(apt) = state.appointment_mut(id) {
            apt.status = closed_status;
            apt.superseded_by = Some(replacement.id);
            apt.updated_at = now;
        }
        state.insert_appointment(replacement.clone());

        info!(
            "Appointment {} superseded by {} (doctor {}, {} {})",
            id, replacement.id, doctor_id, date, time
        );
        Ok(replacement)
    }
}
