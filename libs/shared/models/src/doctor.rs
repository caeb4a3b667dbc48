// libs/shared/models/src/doctor.rs
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    #[serde(alias = "Monday")]
    Monday,
    #[serde(alias = "Tuesday")]
    Tuesday,
    #[serde(alias = "Wednesday")]
    Wednesday,
    #[serde(alias = "Thursday")]
    Thursday,
    #[serde(alias = "Friday")]
    Friday,
    #[serde(alias = "Saturday")]
    Saturday,
    #[serde(alias = "Sunday")]
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Cardiology,
    General,
    Dermatology,
    Orthopedic,
    Ophthalmology,
    Dentistry,
    Neurology,
    Pediatrics,
    Psychiatry,
    Gynecology,
    Other,
}

impl Specialty {
    /// Human-readable label for display surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            Specialty::Cardiology => "Cardiologist",
            Specialty::General => "General Physician",
            Specialty::Dermatology => "Dermatologist",
            Specialty::Orthopedic => "Orthopedic",
            Specialty::Ophthalmology => "Ophthalmologist",
            Specialty::Dentistry => "Dentist",
            Specialty::Neurology => "Neurologist",
            Specialty::Pediatrics => "Pediatrician",
            Specialty::Psychiatry => "Psychiatrist",
            Specialty::Gynecology => "Gynecologist",
            Specialty::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    #[default]
    Consultation,
}

/// A recurring weekly time window during which appointments may be booked.
/// Bookable start times are derived from the window at the configured interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_type: SlotType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    pub available: bool,
    pub slots: Vec<ScheduleSlot>,
}

/// Weekly recurring calendar, keyed by day of week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, DaySchedule>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, day: DayOfWeek) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    pub fn day_mut(&mut self, day: DayOfWeek) -> &mut DaySchedule {
        self.days.entry(day).or_insert_with(|| DaySchedule {
            available: true,
            slots: Vec::new(),
        })
    }

    /// A day is workable when it is not toggled off and has at least one slot.
    pub fn is_workable(&self, day: DayOfWeek) -> bool {
        self.days
            .get(&day)
            .map(|d| d.available && !d.slots.is_empty())
            .unwrap_or(false)
    }

    pub fn slots_for(&self, day: DayOfWeek) -> &[ScheduleSlot] {
        self.days
            .get(&day)
            .map(|d| d.slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &DaySchedule)> {
        self.days.iter().map(|(day, sched)| (*day, sched))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: Specialty,
    pub room_location: Option<String>,
    pub is_active: bool,
    pub schedule: WeeklySchedule,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(name: impl Into<String>, specialty: Specialty) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            specialty,
            room_location: None,
            is_active: true,
            schedule: WeeklySchedule::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
