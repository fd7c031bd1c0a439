// app/src/db/store.rs

use crate::db::is_unique_violation;
use crate::models::AppointmentRow;
use async_trait::async_trait;
use clinic_core::{Appointment, AppointmentStatus, AppointmentStore, ClinicError, ClinicResult, NewAppointment, Slot};
use sqlx::SqlitePool;
use tracing::{instrument, warn};

/// `AppointmentStore` over the SQLite schema. The partial unique index on
/// active slots turns a lost booking race into `SlotTaken`.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

fn slot_conflict_or_store(err: sqlx::Error, slot: &Slot) -> ClinicError {
  if is_unique_violation(&err) {
    warn!(slot = %slot, "Active slot index rejected the write.");
    ClinicError::SlotTaken(slot.clone())
  } else {
    ClinicError::store(err)
  }
}

#[async_trait]
impl AppointmentStore for SqliteStore {
  async fn doctor_exists(&self, doctor_id: i64) -> ClinicResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors WHERE id = ?")
      .bind(doctor_id)
      .fetch_one(&self.pool)
      .await
      .map_err(ClinicError::store)?;
    Ok(count > 0)
  }

  async fn count_active_in_slot(&self, slot: &Slot) -> ClinicResult<i64> {
    sqlx::query_scalar(
      "SELECT COUNT(*) FROM appointments \
       WHERE doctor_id = ? AND appointment_date = ? AND appointment_time = ? AND status != 'cancelled'",
    )
    .bind(slot.doctor_id)
    .bind(&slot.date)
    .bind(&slot.time)
    .fetch_one(&self.pool)
    .await
    .map_err(ClinicError::store)
  }

  #[instrument(name = "SqliteStore::insert_pending", skip_all, fields(slot = %new_appointment.slot), err(Display))]
  async fn insert_pending(&self, new_appointment: &NewAppointment) -> ClinicResult<Appointment> {
    let slot = &new_appointment.slot;
    let row = sqlx::query_as::<_, AppointmentRow>(
      "INSERT INTO appointments (patient_id, doctor_id, appointment_date, appointment_time, status, notes) \
       VALUES (?, ?, ?, ?, ?, ?) \
       RETURNING id, patient_id, doctor_id, appointment_date, appointment_time, status, notes",
    )
    .bind(new_appointment.patient_id)
    .bind(slot.doctor_id)
    .bind(&slot.date)
    .bind(&slot.time)
    .bind(AppointmentStatus::Pending.as_str())
    .bind(&new_appointment.notes)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| slot_conflict_or_store(e, slot))?;
    Appointment::try_from(row)
  }

  async fn find_appointment(&self, appointment_id: i64) -> ClinicResult<Option<Appointment>> {
    let row = sqlx::query_as::<_, AppointmentRow>(
      "SELECT id, patient_id, doctor_id, appointment_date, appointment_time, status, notes \
       FROM appointments WHERE id = ?",
    )
    .bind(appointment_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(ClinicError::store)?;
    row.map(Appointment::try_from).transpose()
  }

  async fn cancel_owned(&self, appointment_id: i64, patient_id: i64) -> ClinicResult<bool> {
    let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ? AND patient_id = ?")
      .bind(AppointmentStatus::Cancelled.as_str())
      .bind(appointment_id)
      .bind(patient_id)
      .execute(&self.pool)
      .await
      .map_err(ClinicError::store)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "SqliteStore::set_status", skip(self), fields(status = %status), err(Display))]
  async fn set_status(&self, appointment_id: i64, status: AppointmentStatus) -> ClinicResult<bool> {
    let outcome = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
      .bind(status.as_str())
      .bind(appointment_id)
      .execute(&self.pool)
      .await;

    match outcome {
      Ok(result) => Ok(result.rows_affected() > 0),
      Err(e) if is_unique_violation(&e) => {
        // Re-activation onto a slot someone else has taken since.
        let appointment = self
          .find_appointment(appointment_id)
          .await?
          .ok_or_else(|| ClinicError::store(e))?;
        Err(ClinicError::SlotTaken(appointment.slot))
      }
      Err(e) => Err(ClinicError::store(e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::test_support::memory_pool;
  use crate::db::{doctors, users};
  use crate::models::{NewDoctor, NewUser};
  use clinic_core::{AppointmentLifecycle, BookingRequest, Caller};
  use std::sync::Arc;

  struct Fixture {
    pool: SqlitePool,
    lifecycle: AppointmentLifecycle,
    doctor_id: i64,
    alice: Caller,
    bob: Caller,
    admin: Caller,
  }

  async fn add_user(pool: &SqlitePool, name: &str, is_admin: bool) -> Caller {
    let user = users::insert(
      pool,
      &NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: "$argon2id$fake".to_string(),
        phone: None,
        is_admin,
      },
    )
    .await
    .unwrap();
    user.caller()
  }

  async fn fixture() -> Fixture {
    let pool = memory_pool().await;
    let doctor_id = doctors::insert(
      &pool,
      &NewDoctor {
        name: "Dr. Sarah Johnson".to_string(),
        specialization: "Cardiology".to_string(),
        qualifications: None,
        experience: None,
        email: None,
        phone: None,
      },
    )
    .await
    .unwrap();
    Fixture {
      lifecycle: AppointmentLifecycle::new(Arc::new(SqliteStore::new(pool.clone()))),
      alice: add_user(&pool, "Alice", false).await,
      bob: add_user(&pool, "Bob", false).await,
      admin: add_user(&pool, "Root", true).await,
      doctor_id,
      pool,
    }
  }

  fn request(doctor_id: i64) -> BookingRequest {
    BookingRequest {
      doctor_id,
      date: "2024-01-10".to_string(),
      time: "10:00".to_string(),
      notes: Some("checkup".to_string()),
    }
  }

  async fn status_of(pool: &SqlitePool, id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM appointments WHERE id = ?")
      .bind(id)
      .fetch_one(pool)
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn book_conflict_cancel_rebook_against_the_schema() {
    let fx = fixture().await;

    let first = fx.lifecycle.book(&fx.alice, request(fx.doctor_id)).await.unwrap();
    assert_eq!(first.status, AppointmentStatus::Pending);
    assert_eq!(first.notes.as_deref(), Some("checkup"));

    let err = fx.lifecycle.book(&fx.bob, request(fx.doctor_id)).await.unwrap_err();
    assert!(matches!(err, ClinicError::SlotTaken(_)));

    assert!(fx.lifecycle.cancel(&fx.alice, first.id).await.unwrap());
    assert_eq!(status_of(&fx.pool, first.id).await, "cancelled");

    let second = fx.lifecycle.book(&fx.bob, request(fx.doctor_id)).await.unwrap();
    assert_ne!(second.id, first.id);
  }

  #[tokio::test]
  async fn unique_index_rejects_a_write_that_skipped_the_check() {
    let fx = fixture().await;
    let store = SqliteStore::new(fx.pool.clone());
    let patient_id = fx.alice.identity().unwrap().user_id;
    let slot = Slot::new(fx.doctor_id, "2024-01-10", "10:00").unwrap();

    store
      .insert_pending(&NewAppointment::new(patient_id, slot.clone(), None))
      .await
      .unwrap();
    let err = store
      .insert_pending(&NewAppointment::new(patient_id, slot.clone(), None))
      .await
      .unwrap_err();
    assert!(matches!(err, ClinicError::SlotTaken(ref taken) if *taken == slot));
    assert_eq!(store.count_active_in_slot(&slot).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn cancel_by_another_patient_changes_nothing() {
    let fx = fixture().await;
    let booked = fx.lifecycle.book(&fx.alice, request(fx.doctor_id)).await.unwrap();

    assert!(!fx.lifecycle.cancel(&fx.bob, booked.id).await.unwrap());
    assert_eq!(status_of(&fx.pool, booked.id).await, "pending");
  }

  #[tokio::test]
  async fn admin_confirm_then_cancel_ends_cancelled() {
    let fx = fixture().await;
    let booked = fx.lifecycle.book(&fx.alice, request(fx.doctor_id)).await.unwrap();

    assert!(fx.lifecycle.update_status(&fx.admin, booked.id, "confirmed").await.unwrap().is_some());
    assert!(fx.lifecycle.update_status(&fx.admin, booked.id, "cancelled").await.unwrap().is_some());
    assert_eq!(status_of(&fx.pool, booked.id).await, "cancelled");
    assert!(fx.lifecycle.update_status(&fx.admin, 9_999, "confirmed").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn reactivation_onto_a_taken_slot_is_a_conflict() {
    let fx = fixture().await;
    let first = fx.lifecycle.book(&fx.alice, request(fx.doctor_id)).await.unwrap();
    fx.lifecycle.cancel(&fx.alice, first.id).await.unwrap();
    fx.lifecycle.book(&fx.bob, request(fx.doctor_id)).await.unwrap();

    let err = fx
      .lifecycle
      .update_status(&fx.admin, first.id, "pending")
      .await
      .unwrap_err();
    assert!(matches!(err, ClinicError::SlotTaken(_)));
    assert_eq!(status_of(&fx.pool, first.id).await, "cancelled");
  }

  #[tokio::test]
  async fn unknown_doctor_is_not_found() {
    let fx = fixture().await;
    let err = fx.lifecycle.book(&fx.alice, request(fx.doctor_id + 100)).await.unwrap_err();
    assert!(matches!(err, ClinicError::NotFound(_)));
  }
}
