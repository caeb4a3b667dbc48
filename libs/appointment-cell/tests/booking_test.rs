use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentError, BookAppointmentRequest, CancelRequest, SearchQuery, StatsQuery, StatsScope,
};
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::lifecycle::LifecycleService;
use appointment_cell::services::stats::StatsService;
use doctor_cell::models::{AddSlotRequest, RegisterDoctorRequest};
use doctor_cell::services::calendar::CalendarService;
use shared_models::appointment::{Appointment, AppointmentStatus, AppointmentType};
use shared_models::doctor::{DayOfWeek, SlotType, Specialty};
use shared_store::AppState;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Doctor working tomorrow's weekday, 09:00 to 12:00.
async fn seed_doctor(state: &AppState) -> (Uuid, NaiveDate) {
    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let calendar = CalendarService::new(state);
    let doctor = calendar
        .register_doctor(RegisterDoctorRequest {
            name: "Dr. Adams".to_string(),
            specialty: Specialty::General,
            room_location: None,
        })
        .await;
    calendar
        .add_slot(
            doctor.id,
            AddSlotRequest {
                day: DayOfWeek::from_date(tomorrow),
                start_time: time(9, 0),
                end_time: time(12, 0),
                slot_type: SlotType::Consultation,
            },
        )
        .await
        .unwrap();
    (doctor.id, tomorrow)
}

fn book_request(doctor_id: Uuid, date: NaiveDate, at: NaiveTime) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id: Uuid::new_v4(),
        doctor_id,
        date,
        time: at,
        appointment_type: AppointmentType::Consultation,
        reason: "Chest pain follow-up".to_string(),
    }
}

#[tokio::test]
async fn test_book_creates_pending_with_default_location() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);

    let appointment = booking.book(book_request(doctor_id, date, time(9, 0))).await.unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.location.as_deref(), Some("Room 203, 2nd Floor"));
    assert_eq!(appointment.supersedes, None);

    let fetched = booking.get(appointment.id).await.unwrap();
    assert_eq!(fetched.doctor_id, doctor_id);
}

#[tokio::test]
async fn test_book_uses_doctor_room_when_set() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    state
        .store
        .write()
        .await
        .doctor_mut(doctor_id)
        .unwrap()
        .room_location = Some("Room 5".to_string());

    let appointment = BookingService::new(&state)
        .book(book_request(doctor_id, date, time(9, 0)))
        .await
        .unwrap();
    assert_eq!(appointment.location.as_deref(), Some("Room 5"));
}

#[tokio::test]
async fn test_book_rejects_past_and_same_day_dates() {
    let state = AppState::default();
    let (doctor_id, _) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let today = Utc::now().date_naive();

    let result = booking.book(book_request(doctor_id, today, time(9, 0))).await;
    assert_matches!(result, Err(AppointmentError::PastDate));

    let result = booking
        .book(book_request(doctor_id, today - Duration::days(1), time(9, 0)))
        .await;
    assert_matches!(result, Err(AppointmentError::PastDate));
}

#[tokio::test]
async fn test_double_booking_rejected() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);

    booking.book(book_request(doctor_id, date, time(9, 30))).await.unwrap();
    let result = booking.book(book_request(doctor_id, date, time(9, 30))).await;
    assert_matches!(result, Err(AppointmentError::SlotUnavailable));

    // The neighboring slot is still open.
    let result = booking.book(book_request(doctor_id, date, time(9, 45))).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_book_off_day_and_unknown_doctor() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);

    // The day after tomorrow has no slots configured.
    let result = booking
        .book(book_request(doctor_id, date + Duration::days(1), time(9, 0)))
        .await;
    assert_matches!(result, Err(AppointmentError::OffDay));

    let result = booking.book(book_request(Uuid::new_v4(), date, time(9, 0))).await;
    assert_matches!(result, Err(AppointmentError::DoctorNotFound));
}

#[tokio::test]
async fn test_book_time_outside_slots_rejected() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;

    let result = BookingService::new(&state)
        .book(book_request(doctor_id, date, time(14, 0)))
        .await;
    assert_matches!(result, Err(AppointmentError::SlotUnavailable));
}

#[tokio::test]
async fn test_confirm_then_complete_before_date_rejected() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let lifecycle = LifecycleService::new(&state);

    let appointment = booking.book(book_request(doctor_id, date, time(9, 0))).await.unwrap();

    let confirmed = lifecycle.confirm(appointment.id).await.unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    // Tomorrow's appointment cannot be completed today.
    let result = lifecycle.complete(appointment.id).await;
    assert_matches!(result, Err(AppointmentError::NotYetDue));
}

#[tokio::test]
async fn test_complete_on_appointment_day() {
    let state = AppState::default();
    let (doctor_id, _) = seed_doctor(&state).await;
    let lifecycle = LifecycleService::new(&state);

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        doctor_id,
        date: now.date_naive(),
        time: time(9, 0),
        appointment_type: AppointmentType::CheckUp,
        reason: "Annual check-up".to_string(),
        status: AppointmentStatus::Confirmed,
        location: None,
        supersedes: None,
        superseded_by: None,
        created_at: now,
        updated_at: now,
    };
    let id = appointment.id;
    state.store.write().await.insert_appointment(appointment);

    let completed = lifecycle.complete(id).await.unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);

    // Terminal: no further transitions.
    let result = lifecycle.cancel(id, CancelRequest::default()).await;
    assert_matches!(result, Err(AppointmentError::Transition(_)));
}

#[tokio::test]
async fn test_cancel_second_attempt_rejected() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let lifecycle = LifecycleService::new(&state);

    let appointment = booking.book(book_request(doctor_id, date, time(9, 0))).await.unwrap();

    let cancelled = lifecycle
        .cancel(
            appointment.id,
            CancelRequest {
                cancelled_by: Some("patient".to_string()),
                reason: Some("Schedule conflict".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let result = lifecycle.cancel(appointment.id, CancelRequest::default()).await;
    assert_matches!(result, Err(AppointmentError::Transition(_)));
}

#[tokio::test]
async fn test_cancel_releases_slot() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let lifecycle = LifecycleService::new(&state);

    let appointment = booking.book(book_request(doctor_id, date, time(9, 0))).await.unwrap();
    lifecycle.cancel(appointment.id, CancelRequest::default()).await.unwrap();

    let rebooked = booking.book(book_request(doctor_id, date, time(9, 0))).await;
    assert!(rebooked.is_ok());
}

#[tokio::test]
async fn test_invalidate_then_cancel_allowed() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let lifecycle = LifecycleService::new(&state);

    let appointment = booking.book(book_request(doctor_id, date, time(9, 0))).await.unwrap();

    let invalidated = lifecycle.invalidate(appointment.id).await.unwrap();
    assert_eq!(invalidated.status, AppointmentStatus::NeedsRescheduling);

    let cancelled = lifecycle.cancel(appointment.id, CancelRequest::default()).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_mark_overdue_missed_respects_grace() {
    let state = AppState::default();
    let (doctor_id, _) = seed_doctor(&state).await;
    let lifecycle = LifecycleService::new(&state);

    let now = Utc::now();
    let overdue = Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        doctor_id,
        date: (now - Duration::hours(4)).date_naive(),
        time: (now - Duration::hours(4)).time(),
        appointment_type: AppointmentType::Consultation,
        reason: "Missed visit".to_string(),
        status: AppointmentStatus::Confirmed,
        location: None,
        supersedes: None,
        superseded_by: None,
        created_at: now,
        updated_at: now,
    };
    let within_grace = Appointment {
        id: Uuid::new_v4(),
        date: (now - Duration::hours(1)).date_naive(),
        time: (now - Duration::hours(1)).time(),
        ..overdue.clone()
    };
    let overdue_id = overdue.id;
    let within_grace_id = within_grace.id;
    {
        let mut store = state.store.write().await;
        store.insert_appointment(overdue);
        store.insert_appointment(within_grace);
    }

    let missed = lifecycle.mark_overdue_missed(now).await;
    assert_eq!(missed, vec![overdue_id]);

    let store = state.store.read().await;
    assert_eq!(store.appointment(overdue_id).unwrap().status, AppointmentStatus::Missed);
    assert_eq!(store.appointment(within_grace_id).unwrap().status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn test_search_filters_and_pagination() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);

    let patient_id = Uuid::new_v4();
    for (i, at) in [time(9, 0), time(9, 15), time(9, 30)].iter().enumerate() {
        let mut request = book_request(doctor_id, date, *at);
        if i < 2 {
            request.patient_id = patient_id;
        }
        booking.book(request).await.unwrap();
    }

    let mine = booking
        .search(SearchQuery {
            patient_id: Some(patient_id),
            ..Default::default()
        })
        .await;
    assert_eq!(mine.len(), 2);
    // Ordered by time of day.
    assert_eq!(mine[0].time, time(9, 0));
    assert_eq!(mine[1].time, time(9, 15));

    let paged = booking
        .search(SearchQuery {
            doctor_id: Some(doctor_id),
            offset: Some(1),
            limit: Some(1),
            ..Default::default()
        })
        .await;
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].time, time(9, 15));

    let none = booking
        .search(SearchQuery {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        })
        .await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_stats_counts_sum_to_total() {
    let state = AppState::default();
    let (doctor_id, date) = seed_doctor(&state).await;
    let booking = BookingService::new(&state);
    let lifecycle = LifecycleService::new(&state);

    let patient_id = Uuid::new_v4();
    let mut ids = Vec::new();
    for at in [time(9, 0), time(9, 15), time(9, 30), time(9, 45)] {
        let mut request = book_request(doctor_id, date, at);
        request.patient_id = patient_id;
        ids.push(booking.book(request).await.unwrap().id);
    }
    lifecycle.confirm(ids[0]).await.unwrap();
    lifecycle.cancel(ids[1], CancelRequest::default()).await.unwrap();
    lifecycle.invalidate(ids[2]).await.unwrap();

    let stats = StatsService::new(&state)
        .compute_stats(StatsQuery {
            scope_id: patient_id,
            scope_type: StatsScope::Patient,
            from: None,
            to: None,
        })
        .await;

    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.needs_rescheduling, 1);
    assert_eq!(
        stats.total,
        stats.pending
            + stats.confirmed
            + stats.completed
            + stats.cancelled
            + stats.missed
            + stats.needs_rescheduling
    );
    // Pending and confirmed tomorrow both count as upcoming.
    assert_eq!(stats.upcoming, 2);

    // Doctor scope sees the same set here.
    let doctor_stats = StatsService::new(&state)
        .compute_stats(StatsQuery {
            scope_id: doctor_id,
            scope_type: StatsScope::Doctor,
            from: None,
            to: None,
        })
        .await;
    assert_eq!(doctor_stats.total, 4);

    // Date filter excluding everything.
    let empty = StatsService::new(&state)
        .compute_stats(StatsQuery {
            scope_id: patient_id,
            scope_type: StatsScope::Patient,
            from: Some(date + Duration::days(1)),
            to: None,
        })
        .await;
    assert_eq!(empty.total, 0);
}
