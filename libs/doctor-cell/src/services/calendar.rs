// libs/doctor-cell/src/services/calendar.rs
use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::LifecycleEvent;
use shared_models::doctor::{DayOfWeek, Doctor, ScheduleSlot};
use shared_store::{AppState, ScheduleStore};

use crate::models::{
    AddSlotRequest, DayView, DoctorSummary, RegisterDoctorRequest, ScheduleError, SlotView,
    WeeklyScheduleResponse,
};

/// Result of a day toggle: the new flag plus the appointments pushed into
/// `needs_rescheduling` when the day went off.
#[derive(Debug, Clone)]
pub struct DayToggle {
    pub available: bool,
    pub invalidated: Vec<Uuid>,
}

pub struct CalendarService {
    store: ScheduleStore,
    config: AppConfig,
}

impl CalendarService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    pub async fn register_doctor(&self, request: RegisterDoctorRequest) -> Doctor {
        let mut doctor = Doctor::new(request.name, request.specialty);
        doctor.room_location = request.room_location;

        let mut state = self.store.write().await;
        state.insert_doctor(doctor.clone());
        info!("Registered doctor {} ({})", doctor.id, doctor.specialty.display_name());
        doctor
    }

    pub async fn list_doctors(&self) -> Vec<DoctorSummary> {
        let state = self.store.read().await;
        let mut doctors: Vec<DoctorSummary> = state
            .doctors()
            .filter(|d| d.is_active)
            .map(|d| DoctorSummary {
                id: d.id,
                name: d.name.clone(),
                specialty: d.specialty,
                specialty_display: d.specialty.display_name().to_string(),
                room_location: d.room_location.clone(),
            })
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        doctors
    }

    pub async fn get_schedule(&self, doctor_id: Uuid) -> Result<WeeklyScheduleResponse, ScheduleError> {
        let state = self.store.read().await;
        let doctor = state.doctor(doctor_id).ok_or(ScheduleError::DoctorNotFound)?;

        let weekly_schedule: Vec<DayView> = DayOfWeek::ALL
            .iter()
            .map(|&day| {
                DayView {
                    day,
                    available: doctor.schedule.is_workable(day),
                    slots: doctor
                        .schedule
                        .slots_for(day)
                        .iter()
                        .map(|slot| SlotView {
                            id: slot.id,
                            start_time: slot.start_time,
                            end_time: slot.end_time,
                            slot_type: slot.slot_type,
                        })
                        .collect(),
                }
            })
            .collect();

        let working_days = weekly_schedule.iter().filter(|d| d.available).count() as u32;

        Ok(WeeklyScheduleResponse {
            doctor_id,
            weekly_schedule,
            working_days,
        })
    }

    /// Add a recurring slot to a doctor's weekly calendar.
    pub async fn add_slot(
        &self,
        doctor_id: Uuid,
        request: AddSlotRequest,
    ) -> Result<Uuid, ScheduleError> {
        if request.start_time >= request.end_time {
            return Err(ScheduleError::InvalidRange);
        }

        let mut state = self.store.write().await;
        let doctor = state.doctor_mut(doctor_id).ok_or(ScheduleError::DoctorNotFound)?;

        let day = doctor.schedule.day_mut(request.day);
        let overlaps = day.slots.iter().any(|existing| {
            request.start_time < existing.end_time && request.end_time > existing.start_time
        });
        if overlaps {
            return Err(ScheduleError::Overlap(request.day));
        }

        let slot = ScheduleSlot {
            id: Uuid::new_v4(),
            start_time: request.start_time,
            end_time: request.end_time,
            slot_type: request.slot_type,
        };
        let slot_id = slot.id;
        day.slots.push(slot);
        day.slots.sort_by_key(|s| s.start_time);
        doctor.updated_at = Utc::now();

        debug!("Added slot {} on {} for doctor {}", slot_id, request.day, doctor_id);
        Ok(slot_id)
    }

    /// Remove a slot. Appointments already booked inside the window stay
    /// honored; only future availability shrinks.
    pub async fn remove_slot(&self, doctor_id: Uuid, slot_id: Uuid) -> Result<(), ScheduleError> {
        let mut state = self.store.write().await;
        let doctor = state.doctor_mut(doctor_id).ok_or(ScheduleError::DoctorNotFound)?;

        // Locate first; a failed delete must not touch the calendar.
        let day = doctor
            .schedule
            .iter()
            .find(|(_, sched)| sched.slots.iter().any(|s| s.id == slot_id))
            .map(|(day, _)| day)
            .ok_or(ScheduleError::SlotNotFound)?;

        let sched = doctor.schedule.day_mut(day);
        sched.slots.retain(|s| s.id != slot_id);
        doctor.updated_at = Utc::now();
        debug!("Removed slot {} from doctor {}", slot_id, doctor_id);
        Ok(())
    }

    /// Flip a day between available and off. Turning a day off does not cancel
    /// existing appointments; it moves the active ones falling on that weekday
    /// within the invalidation horizon to `needs_rescheduling`, all inside the
    /// same transaction as the flip.
    pub async fn toggle_day(&self, doctor_id: Uuid, day: DayOfWeek) -> Result<DayToggle, ScheduleError> {
        let mut state = self.store.write().await;
        let doctor = state.doctor_mut(doctor_id).ok_or(ScheduleError::DoctorNotFound)?;

        let sched = doctor.schedule.day_mut(day);
        sched.available = !sched.available;
        let now_available = sched.available;
        doctor.updated_at = Utc::now();

        let mut invalidated = Vec::new();
        if !now_available {
            let today = Utc::now().date_naive();
            let horizon = today + Duration::days(self.config.invalidation_horizon_days as i64);

            for apt in state.appointments_mut() {
                if apt.doctor_id == doctor_id
                    && apt.is_active()
                    && apt.date > today
                    && apt.date <= horizon
                    && DayOfWeek::from_date(apt.date) == day
                {
                    if let Ok(next) = apt.status.apply(LifecycleEvent::Invalidate) {
                        apt.status = next;
                        apt.updated_at = Utc::now();
                        invalidated.push(apt.id);
                    }
                }
            }

            if !invalidated.is_empty() {
                info!(
                    "Day {} toggled off for doctor {}; {} appointment(s) need rescheduling",
                    day,
                    doctor_id,
                    invalidated.len()
                );
            }
        }

        Ok(DayToggle {
            available: now_available,
            invalidated,
        })
    }
}
