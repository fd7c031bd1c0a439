// tests/booking_tests.rs
mod common;
use clinic_core::{AppointmentStatus, BookingRequest, Caller, ClinicError, Slot};
use common::*;
use serial_test::serial;
use std::sync::Arc;

const DATE: &str = "2024-01-10";
const TIME: &str = "10:00";

#[tokio::test]
#[serial]
async fn book_conflict_cancel_rebook() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);
  let bob = patient(11);

  let first = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  assert_eq!(first.status, AppointmentStatus::Pending);
  assert_eq!(first.patient_id, 10);

  let err = lifecycle.book(&bob, request(DOCTOR_ID, DATE, TIME)).await.unwrap_err();
  match err {
    ClinicError::SlotTaken(slot) => assert_eq!(slot, Slot::new(DOCTOR_ID, DATE, TIME).unwrap()),
    other => panic!("Expected SlotTaken, got {:?}", other),
  }

  assert!(lifecycle.cancel(&alice, first.id).await.unwrap());
  assert_eq!(store.status_of(first.id), Some(AppointmentStatus::Cancelled));

  let rebooked = lifecycle.book(&bob, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  assert_ne!(rebooked.id, first.id);
  assert_eq!(store.appointments().len(), 2);
}

#[tokio::test]
#[serial]
async fn same_patient_cannot_double_book_a_slot() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);

  lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  let err = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap_err();
  assert!(matches!(err, ClinicError::SlotTaken(_)));
}

#[tokio::test]
#[serial]
async fn unpadded_spelling_of_a_booked_slot_is_refused() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);

  lifecycle.book(&patient(10), request(DOCTOR_ID, DATE, "09:00")).await.unwrap();
  for (date, time) in [(DATE, "9:00"), ("2024-1-10", "09:00"), ("2024-1-10", "9:00")] {
    let err = lifecycle.book(&patient(11), request(DOCTOR_ID, date, time)).await.unwrap_err();
    assert!(matches!(err, ClinicError::Validation(_)), "booked {} {}", date, time);
  }
  assert_eq!(store.active_in(&Slot::new(DOCTOR_ID, DATE, "09:00").unwrap()), 1);
  assert_eq!(store.appointments().len(), 1);
}

#[tokio::test]
#[serial]
async fn slots_differ_by_doctor_date_and_time() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID, OTHER_DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);

  lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  lifecycle.book(&alice, request(OTHER_DOCTOR_ID, DATE, TIME)).await.unwrap();
  lifecycle.book(&alice, request(DOCTOR_ID, "2024-01-11", TIME)).await.unwrap();
  lifecycle.book(&alice, request(DOCTOR_ID, DATE, "10:30")).await.unwrap();
  assert_eq!(store.appointments().len(), 4);
}

#[tokio::test]
#[serial]
async fn slot_checker_ignores_cancelled_appointments() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);
  let slot = Slot::new(DOCTOR_ID, DATE, TIME).unwrap();

  assert!(!lifecycle.slots().is_slot_taken(&slot).await.unwrap());
  let booked = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  assert!(lifecycle.slots().is_slot_taken(&slot).await.unwrap());

  lifecycle.update_status(&admin(), booked.id, "rejected").await.unwrap();
  assert!(lifecycle.slots().is_slot_taken(&slot).await.unwrap());

  lifecycle.update_status(&admin(), booked.id, "cancelled").await.unwrap();
  assert!(!lifecycle.slots().is_slot_taken(&slot).await.unwrap());
}

#[tokio::test]
#[serial]
async fn anonymous_booking_requires_login() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);

  let err = lifecycle
    .book(&Caller::Anonymous, request(DOCTOR_ID, DATE, TIME))
    .await
    .unwrap_err();
  assert!(matches!(err, ClinicError::LoginRequired));
  assert!(store.appointments().is_empty());
}

#[tokio::test]
#[serial]
async fn booking_unknown_doctor_is_not_found() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);

  let err = lifecycle.book(&patient(10), request(99, DATE, TIME)).await.unwrap_err();
  assert!(matches!(err, ClinicError::NotFound(_)));
  assert!(store.appointments().is_empty());
}

#[tokio::test]
#[serial]
async fn malformed_slot_is_rejected_before_touching_the_store() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);

  let err = lifecycle.book(&patient(10), request(DOCTOR_ID, "", TIME)).await.unwrap_err();
  assert!(matches!(err, ClinicError::Validation(_)));
  let err = lifecycle
    .book(&patient(10), request(DOCTOR_ID, DATE, "9 o'clock"))
    .await
    .unwrap_err();
  assert!(matches!(err, ClinicError::Validation(_)));
  assert!(store.appointments().is_empty());
}

#[tokio::test]
#[serial]
async fn notes_are_stored_trimmed() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);

  let booked = lifecycle
    .book(
      &patient(10),
      BookingRequest {
        notes: Some("  recurring headache ".to_string()),
        ..request(DOCTOR_ID, DATE, TIME)
      },
    )
    .await
    .unwrap();
  assert_eq!(booked.notes.as_deref(), Some("recurring headache"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = Arc::new(lifecycle_with(&store));

  let mut tasks = Vec::new();
  for patient_id in 1..=16 {
    let lifecycle = lifecycle.clone();
    tasks.push(tokio::spawn(async move {
      lifecycle.book(&patient(patient_id), request(DOCTOR_ID, DATE, TIME)).await
    }));
  }

  let mut booked = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(_) => booked += 1,
      Err(ClinicError::SlotTaken(_)) => {}
      Err(other) => panic!("Unexpected error: {:?}", other),
    }
  }
  assert_eq!(booked, 1);
  assert_eq!(store.active_in(&Slot::new(DOCTOR_ID, DATE, TIME).unwrap()), 1);
}

#[tokio::test]
#[serial]
async fn cancel_only_touches_the_owners_appointment() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);
  let mallory = patient(66);

  let booked = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  let before = store.appointments();

  assert!(!lifecycle.cancel(&mallory, booked.id).await.unwrap());
  assert_eq!(store.appointments(), before);

  assert!(!lifecycle.cancel(&alice, 9_999).await.unwrap());
  assert_eq!(store.appointments(), before);

  let err = lifecycle.cancel(&Caller::Anonymous, booked.id).await.unwrap_err();
  assert!(matches!(err, ClinicError::LoginRequired));
  assert_eq!(store.status_of(booked.id), Some(AppointmentStatus::Pending));
}

#[tokio::test]
#[serial]
async fn admin_status_sequence_ends_on_last_value() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let booked = lifecycle.book(&patient(10), request(DOCTOR_ID, DATE, TIME)).await.unwrap();

  assert_eq!(
    lifecycle.update_status(&admin(), booked.id, "confirmed").await.unwrap(),
    Some(AppointmentStatus::Confirmed)
  );
  assert_eq!(store.status_of(booked.id), Some(AppointmentStatus::Confirmed));
  assert_eq!(
    lifecycle.update_status(&admin(), booked.id, "cancelled").await.unwrap(),
    Some(AppointmentStatus::Cancelled)
  );
  assert_eq!(store.status_of(booked.id), Some(AppointmentStatus::Cancelled));
}

#[tokio::test]
#[serial]
async fn status_update_is_admin_only() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);
  let booked = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();

  let err = lifecycle.update_status(&alice, booked.id, "confirmed").await.unwrap_err();
  assert!(matches!(err, ClinicError::AdminRequired));
  let err = lifecycle
    .update_status(&Caller::Anonymous, booked.id, "confirmed")
    .await
    .unwrap_err();
  assert!(matches!(err, ClinicError::AdminRequired));
  assert_eq!(store.status_of(booked.id), Some(AppointmentStatus::Pending));
}

#[tokio::test]
#[serial]
async fn unknown_status_leaves_the_record_alone() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let booked = lifecycle.book(&patient(10), request(DOCTOR_ID, DATE, TIME)).await.unwrap();

  let err = lifecycle.update_status(&admin(), booked.id, "archived").await.unwrap_err();
  assert!(matches!(err, ClinicError::InvalidStatus(ref s) if s == "archived"));
  assert_eq!(store.status_of(booked.id), Some(AppointmentStatus::Pending));
}

#[tokio::test]
#[serial]
async fn status_update_on_missing_appointment_reports_none() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  assert_eq!(lifecycle.update_status(&admin(), 42, "confirmed").await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn reactivating_onto_a_rebooked_slot_conflicts() {
  setup_tracing();
  let store = MemoryStore::with_doctors(&[DOCTOR_ID]);
  let lifecycle = lifecycle_with(&store);
  let alice = patient(10);
  let bob = patient(11);

  let first = lifecycle.book(&alice, request(DOCTOR_ID, DATE, TIME)).await.unwrap();
  lifecycle.cancel(&alice, first.id).await.unwrap();
  lifecycle.book(&bob, request(DOCTOR_ID, DATE, TIME)).await.unwrap();

  let err = lifecycle.update_status(&admin(), first.id, "confirmed").await.unwrap_err();
  assert!(matches!(err, ClinicError::SlotTaken(_)));
  assert_eq!(store.status_of(first.id), Some(AppointmentStatus::Cancelled));
}
