// libs/doctor-cell/src/services/slots.rs
//
// Slot allocation is a pure function of the store state: calendar windows
// stepped at the configured interval, minus times held by active appointments.
// The same functions run against a read snapshot for listings and against a
// write guard for commit-time re-validation, so queries and commits can never
// disagree about what "available" means.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::doctor::{DayOfWeek, Doctor, ScheduleSlot};
use shared_store::{AppState, ScheduleStore, StoreState};

use crate::models::{AvailableDate, DayAvailability, OpenDate, ScheduleError};

/// Bookable start times derived from a day's schedule slots. Steps in whole
/// minutes since midnight; `NaiveTime` arithmetic wraps at midnight, which
/// would never terminate for a window ending inside the last interval of the
/// day.
pub fn slot_start_times(slots: &[ScheduleSlot], interval_minutes: u32) -> Vec<NaiveTime> {
    if interval_minutes == 0 {
        return Vec::new();
    }

    let mut starts = Vec::new();
    for slot in slots {
        let end = slot.end_time.num_seconds_from_midnight() / 60;
        let mut current = slot.start_time.num_seconds_from_midnight() / 60;
        while current < end {
            if let Some(time) = NaiveTime::from_hms_opt(current / 60, current % 60, 0) {
                starts.push(time);
            }
            current += interval_minutes;
        }
    }

    starts.sort();
    starts.dedup();
    starts
}

/// Free start times for a doctor on a date. Off days (day toggled off, or no
/// slots configured for that weekday) are a distinguished result.
pub fn day_times(
    state: &StoreState,
    doctor: &Doctor,
    date: NaiveDate,
    interval_minutes: u32,
) -> DayAvailability {
    let day = DayOfWeek::from_date(date);
    if !doctor.schedule.is_workable(day) {
        return DayAvailability::OffDay;
    }

    let booked = state.booked_times(doctor.id, date);
    let times = slot_start_times(doctor.schedule.slots_for(day), interval_minutes)
        .into_iter()
        .filter(|time| !booked.contains(time))
        .collect();

    DayAvailability::Times(times)
}

/// Booking picker dates: the next `horizon_days` days starting tomorrow, off
/// days included but flagged.
pub fn booking_dates(doctor: &Doctor, today: NaiveDate, horizon_days: u32) -> Vec<AvailableDate> {
    (1..=horizon_days as i64)
        .map(|offset| {
            let date = today + Duration::days(offset);
            AvailableDate {
                date,
                day: date.format("%A").to_string(),
                formatted: date.format("%b %d, %Y").to_string(),
                is_off: !doctor.schedule.is_workable(DayOfWeek::from_date(date)),
            }
        })
        .collect()
}

/// Reschedule/transfer window: the next `window_days` calendar days starting
/// tomorrow, keeping only workable days that still have at least one free time.
pub fn open_dates(
    state: &StoreState,
    doctor: &Doctor,
    today: NaiveDate,
    window_days: u32,
    interval_minutes: u32,
) -> Vec<OpenDate> {
    let mut dates = Vec::new();

    for offset in 1..=window_days as i64 {
        let date = today + Duration::days(offset);
        if let DayAvailability::Times(times) = day_times(state, doctor, date, interval_minutes) {
            if !times.is_empty() {
                dates.push(OpenDate {
                    date,
                    day: date.format("%A").to_string(),
                    formatted: date.format("%b %d, %Y").to_string(),
                    times,
                });
            }
        }
    }

    dates
}

/// Read-side allocator used by the availability endpoints.
pub struct SlotAllocator {
    store: ScheduleStore,
    config: AppConfig,
}

impl SlotAllocator {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    pub async fn list_available_dates(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<AvailableDate>, ScheduleError> {
        let state = self.store.read().await;
        let doctor = state
            .doctor(doctor_id)
            .filter(|d| d.is_active)
            .ok_or(ScheduleError::DoctorNotFound)?;

        let today = Utc::now().date_naive();
        let dates = booking_dates(doctor, today, self.config.booking_horizon_days);
        debug!("Computed {} candidate dates for doctor {}", dates.len(), doctor_id);
        Ok(dates)
    }

    pub async fn list_available_times(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<DayAvailability, ScheduleError> {
        let state = self.store.read().await;
        let doctor = state
            .doctor(doctor_id)
            .filter(|d| d.is_active)
            .ok_or(ScheduleError::DoctorNotFound)?;

        Ok(day_times(
            &state,
            doctor,
            date,
            self.config.slot_interval_minutes,
        ))
    }
}
