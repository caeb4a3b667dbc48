use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// Granularity of bookable start times within a schedule slot.
    pub slot_interval_minutes: u32,
    /// How many days ahead the booking date picker looks (starting tomorrow).
    pub booking_horizon_days: u32,
    /// Calendar-day window offered for reschedules and transfers.
    pub reschedule_window_days: u32,
    /// How far ahead a day-off toggle invalidates existing appointments.
    pub invalidation_horizon_days: u32,
    /// Hours past the scheduled time before an unattended appointment is missed.
    pub missed_grace_hours: u32,
    /// Fallback consultation location when a doctor has no room assigned.
    pub default_location: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            slot_interval_minutes: env_u32("SLOT_INTERVAL_MINUTES", 15),
            booking_horizon_days: env_u32("BOOKING_HORIZON_DAYS", 3),
            reschedule_window_days: env_u32("RESCHEDULE_WINDOW_DAYS", 7),
            invalidation_horizon_days: env_u32("INVALIDATION_HORIZON_DAYS", 30),
            missed_grace_hours: env_u32("MISSED_GRACE_HOURS", 3),
            default_location: env::var("DEFAULT_LOCATION")
                .unwrap_or_else(|_| "Room 203, 2nd Floor".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            slot_interval_minutes: 15,
            booking_horizon_days: 3,
            reschedule_window_days: 7,
            invalidation_horizon_days: 30,
            missed_grace_hours: 3,
            default_location: "Room 203, 2nd Floor".to_string(),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number, using default {}", key, default);
            default
        }),
        Err(_) => default,
    }
}
