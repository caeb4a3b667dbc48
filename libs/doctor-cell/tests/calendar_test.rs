use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use doctor_cell::models::{AddSlotRequest, RegisterDoctorRequest, ScheduleError};
use doctor_cell::services::calendar::CalendarService;
use shared_models::appointment::{Appointment, AppointmentStatus, AppointmentType};
use shared_models::doctor::{DayOfWeek, SlotType, Specialty};
use shared_store::AppState;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn register_doctor(state: &AppState, name: &str, specialty: Specialty) -> Uuid {
    CalendarService::new(state)
        .register_doctor(RegisterDoctorRequest {
            name: name.to_string(),
            specialty,
            room_location: None,
        })
        .await
        .id
}

async fn add_slot(state: &AppState, doctor_id: Uuid, day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> Result<Uuid, ScheduleError> {
    CalendarService::new(state)
        .add_slot(
            doctor_id,
            AddSlotRequest {
                day,
                start_time: start,
                end_time: end,
                slot_type: SlotType::Consultation,
            },
        )
        .await
}

fn make_appointment(
    doctor_id: Uuid,
    date: NaiveDate,
    at: NaiveTime,
    status: AppointmentStatus,
) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        doctor_id,
        date,
        time: at,
        appointment_type: AppointmentType::Consultation,
        reason: "Routine visit".to_string(),
        status,
        location: None,
        supersedes: None,
        superseded_by: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_add_slot_rejects_inverted_range() {
    let state = AppState::default();
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let result = add_slot(&state, doctor_id, DayOfWeek::Monday, time(10, 0), time(9, 0)).await;
    assert_matches!(result, Err(ScheduleError::InvalidRange));

    let result = add_slot(&state, doctor_id, DayOfWeek::Monday, time(9, 0), time(9, 0)).await;
    assert_matches!(result, Err(ScheduleError::InvalidRange));
}

#[tokio::test]
async fn test_add_slot_rejects_overlap_same_day() {
    let state = AppState::default();
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    add_slot(&state, doctor_id, DayOfWeek::Monday, time(9, 0), time(11, 0))
        .await
        .unwrap();

    let result = add_slot(&state, doctor_id, DayOfWeek::Monday, time(10, 0), time(12, 0)).await;
    assert_matches!(result, Err(ScheduleError::Overlap(DayOfWeek::Monday)));

    // Same window on another day is fine.
    let result = add_slot(&state, doctor_id, DayOfWeek::Tuesday, time(10, 0), time(12, 0)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_adjacent_slots_do_not_overlap() {
    let state = AppState::default();
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    add_slot(&state, doctor_id, DayOfWeek::Monday, time(9, 0), time(10, 0))
        .await
        .unwrap();
    let result = add_slot(&state, doctor_id, DayOfWeek::Monday, time(10, 0), time(11, 0)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_remove_slot() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let slot_id = add_slot(&state, doctor_id, DayOfWeek::Friday, time(9, 0), time(10, 0))
        .await
        .unwrap();

    calendar.remove_slot(doctor_id, slot_id).await.unwrap();

    let schedule = calendar.get_schedule(doctor_id).await.unwrap();
    let friday = schedule
        .weekly_schedule
        .iter()
        .find(|d| d.day == DayOfWeek::Friday)
        .unwrap();
    assert!(friday.slots.is_empty());

    let result = calendar.remove_slot(doctor_id, slot_id).await;
    assert_matches!(result, Err(ScheduleError::SlotNotFound));
}

#[tokio::test]
async fn test_remove_slot_unknown_doctor() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);

    let result = calendar.remove_slot(Uuid::new_v4(), Uuid::new_v4()).await;
    assert_matches!(result, Err(ScheduleError::DoctorNotFound));
}

#[tokio::test]
async fn test_failed_remove_leaves_calendar_untouched() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let result = calendar.remove_slot(doctor_id, Uuid::new_v4()).await;
    assert_matches!(result, Err(ScheduleError::SlotNotFound));

    // The lookup must not have materialized empty day entries.
    let store = state.store.read().await;
    let doctor = store.doctor(doctor_id).unwrap();
    assert!(DayOfWeek::ALL.iter().all(|&day| doctor.schedule.day(day).is_none()));
}

#[tokio::test]
async fn test_get_schedule_lists_every_weekday() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    add_slot(&state, doctor_id, DayOfWeek::Monday, time(9, 0), time(12, 0))
        .await
        .unwrap();
    add_slot(&state, doctor_id, DayOfWeek::Wednesday, time(14, 0), time(17, 0))
        .await
        .unwrap();

    let schedule = calendar.get_schedule(doctor_id).await.unwrap();
    assert_eq!(schedule.weekly_schedule.len(), 7);
    assert_eq!(schedule.working_days, 2);

    let monday = &schedule.weekly_schedule[0];
    assert_eq!(monday.day, DayOfWeek::Monday);
    assert!(monday.available);
    assert_eq!(monday.slots.len(), 1);

    // Days without slots are listed but not workable.
    let tuesday = &schedule.weekly_schedule[1];
    assert_eq!(tuesday.day, DayOfWeek::Tuesday);
    assert!(!tuesday.available);
}

#[tokio::test]
async fn test_toggle_day_invalidates_upcoming_appointments() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let day = DayOfWeek::from_date(tomorrow);
    add_slot(&state, doctor_id, day, time(9, 0), time(12, 0))
        .await
        .unwrap();

    let apt = make_appointment(doctor_id, tomorrow, time(9, 0), AppointmentStatus::Confirmed);
    let apt_id = apt.id;
    state.store.write().await.insert_appointment(apt);

    let toggle = calendar.toggle_day(doctor_id, day).await.unwrap();
    assert!(!toggle.available);
    assert_eq!(toggle.invalidated, vec![apt_id]);

    let store = state.store.read().await;
    let apt = store.appointment(apt_id).unwrap();
    assert_eq!(apt.status, AppointmentStatus::NeedsRescheduling);
}

#[tokio::test]
async fn test_toggle_day_back_on_invalidates_nothing() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let day = DayOfWeek::from_date(tomorrow);
    add_slot(&state, doctor_id, day, time(9, 0), time(12, 0))
        .await
        .unwrap();

    let off = calendar.toggle_day(doctor_id, day).await.unwrap();
    assert!(!off.available);

    let on = calendar.toggle_day(doctor_id, day).await.unwrap();
    assert!(on.available);
    assert!(on.invalidated.is_empty());
}

#[tokio::test]
async fn test_toggle_day_spares_terminal_and_distant_appointments() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);
    let doctor_id = register_doctor(&state, "Dr. Adams", Specialty::General).await;

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let day = DayOfWeek::from_date(tomorrow);
    add_slot(&state, doctor_id, day, time(9, 0), time(12, 0))
        .await
        .unwrap();

    let completed = make_appointment(doctor_id, tomorrow, time(9, 0), AppointmentStatus::Completed);
    let completed_id = completed.id;
    // Same weekday, five weeks out: past the invalidation horizon.
    let distant = make_appointment(
        doctor_id,
        tomorrow + Duration::days(35),
        time(9, 15),
        AppointmentStatus::Pending,
    );
    let distant_id = distant.id;
    {
        let mut store = state.store.write().await;
        store.insert_appointment(completed);
        store.insert_appointment(distant);
    }

    let toggle = calendar.toggle_day(doctor_id, day).await.unwrap();
    assert!(toggle.invalidated.is_empty());

    let store = state.store.read().await;
    assert_eq!(store.appointment(completed_id).unwrap().status, AppointmentStatus::Completed);
    assert_eq!(store.appointment(distant_id).unwrap().status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_list_doctors_sorted_and_active_only() {
    let state = AppState::default();
    let calendar = CalendarService::new(&state);

    register_doctor(&state, "Dr. Zhang", Specialty::Cardiology).await;
    register_doctor(&state, "Dr. Adams", Specialty::General).await;
    let inactive_id = register_doctor(&state, "Dr. Gone", Specialty::General).await;
    state
        .store
        .write()
        .await
        .doctor_mut(inactive_id)
        .unwrap()
        .is_active = false;

    let doctors = calendar.list_doctors().await;
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0].name, "Dr. Adams");
    assert_eq!(doctors[1].name, "Dr. Zhang");
}
