// libs/appointment-cell/src/services/stats.rs
use chrono::Utc;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_store::{AppState, ScheduleStore};

use crate::models::{AppointmentStats, StatsQuery, StatsScope};

/// Read-only per-status projection over the appointment set.
pub struct StatsService {
    store: ScheduleStore,
}

impl StatsService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn compute_stats(&self, query: StatsQuery) -> AppointmentStats {
        let state = self.store.read().await;
        let now = Utc::now().naive_utc();

        let in_scope = |apt: &&Appointment| match query.scope_type {
            StatsScope::Patient => apt.patient_id == query.scope_id,
            StatsScope::Doctor => apt.doctor_id == query.scope_id,
        };

        let mut stats = AppointmentStats::default();
        for apt in state
            .appointments()
            .filter(in_scope)
            .filter(|apt| query.from.map_or(true, |from| apt.date >= from))
            .filter(|apt| query.to.map_or(true, |to| apt.date <= to))
        {
            stats.total += 1;
            match apt.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
                AppointmentStatus::Missed => stats.missed += 1,
                AppointmentStatus::NeedsRescheduling => stats.needs_rescheduling += 1,
            }
            if apt.is_active() && apt.scheduled_at() >= now {
                stats.upcoming += 1;
            }
        }
        stats
    }
}
