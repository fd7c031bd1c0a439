// app/src/db/appointments.rs

use crate::db::{doctors, users};
use crate::errors::Result;
use crate::models::{AdminAppointment, DashboardCounts, PatientAppointment};
use sqlx::SqlitePool;

/// The caller's appointments, newest slot first.
pub async fn for_patient(pool: &SqlitePool, patient_id: i64) -> Result<Vec<PatientAppointment>> {
  let appointments = sqlx::query_as::<_, PatientAppointment>(
    "SELECT a.id, a.doctor_id, a.appointment_date, a.appointment_time, a.status, a.notes, \
            d.name AS doctor_name, d.specialization \
     FROM appointments a \
     JOIN doctors d ON a.doctor_id = d.id \
     WHERE a.patient_id = ? \
     ORDER BY a.appointment_date DESC, a.appointment_time DESC",
  )
  .bind(patient_id)
  .fetch_all(pool)
  .await?;
  Ok(appointments)
}

/// Every appointment with its patient and doctor, newest slot first.
pub async fn all_for_admin(pool: &SqlitePool) -> Result<Vec<AdminAppointment>> {
  let appointments = sqlx::query_as::<_, AdminAppointment>(
    "SELECT a.id, a.appointment_date, a.appointment_time, a.status, a.notes, \
            u.name AS patient_name, u.email AS patient_email, \
            d.name AS doctor_name, d.specialization \
     FROM appointments a \
     JOIN users u ON a.patient_id = u.id \
     JOIN doctors d ON a.doctor_id = d.id \
     ORDER BY a.appointment_date DESC, a.appointment_time DESC",
  )
  .fetch_all(pool)
  .await?;
  Ok(appointments)
}

pub async fn count_pending(pool: &SqlitePool) -> Result<i64> {
  let count = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE status = 'pending'")
    .fetch_one(pool)
    .await?;
  Ok(count)
}

pub async fn dashboard_counts(pool: &SqlitePool) -> Result<DashboardCounts> {
  Ok(DashboardCounts {
    pending_appointments: count_pending(pool).await?,
    available_doctors: doctors::count_available(pool).await?,
    patients: users::count_patients(pool).await?,
  })
}
