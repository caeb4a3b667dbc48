//! In-memory schedule store.
//!
//! All engine state (doctor calendars, appointment records) lives behind one
//! `RwLock`. A write guard is the unit of atomicity: every booking, reschedule,
//! transfer and cancel re-validates and writes while holding it, so concurrent
//! writers serialize and the losing writer observes the winner's committed
//! state. Read-only queries take a read guard and see a consistent snapshot.
//!
//! Handles are passed explicitly into services; tests construct their own store
//! instead of sharing process-wide state.

use chrono::{NaiveDate, NaiveTime};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::Appointment;
use shared_models::doctor::Doctor;

/// Shared handler state: configuration plus the store handle. Passed as
/// `Arc<AppState>` into every router.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: AppConfig,
    pub store: ScheduleStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: ScheduleStore::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    doctors: HashMap<Uuid, Doctor>,
    appointments: HashMap<Uuid, Appointment>,
}

impl StoreState {
    pub fn doctor(&self, id: Uuid) -> Option<&Doctor> {
        self.doctors.get(&id)
    }

    pub fn doctor_mut(&mut self, id: Uuid) -> Option<&mut Doctor> {
        self.doctors.get_mut(&id)
    }

    pub fn insert_doctor(&mut self, doctor: Doctor) {
        self.doctors.insert(doctor.id, doctor);
    }

    pub fn doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.values()
    }

    pub fn appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.get(&id)
    }

    pub fn appointment_mut(&mut self, id: Uuid) -> Option<&mut Appointment> {
        self.appointments.get_mut(&id)
    }

    pub fn insert_appointment(&mut self, appointment: Appointment) {
        self.appointments.insert(appointment.id, appointment);
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }

    pub fn appointments_mut(&mut self) -> impl Iterator<Item = &mut Appointment> {
        self.appointments.values_mut()
    }

    /// Start times held by active (pending/confirmed) appointments for a
    /// doctor on a date. These are the times the allocator must exclude.
    pub fn booked_times(&self, doctor_id: Uuid, date: NaiveDate) -> HashSet<NaiveTime> {
        self.appointments
            .values()
            .filter(|apt| apt.doctor_id == doctor_id && apt.date == date && apt.is_active())
            .map(|apt| apt.time)
            .collect()
    }

    /// Whether an active appointment already holds (doctor, date, time).
    pub fn slot_taken(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> bool {
        self.appointments.values().any(|apt| {
            apt.doctor_id == doctor_id
                && apt.date == date
                && apt.time == time
                && apt.is_active()
                && Some(apt.id) != exclude
        })
    }
}

/// Cloneable handle to the shared store.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    inner: Arc<RwLock<StoreState>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for read-only queries. May run concurrently with other reads;
    /// results can be stale by the time a write is attempted, which is why
    /// writes re-validate under their own guard.
    pub async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().await
    }

    /// Exclusive transaction guard for check-then-write sections.
    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().await
    }
}
