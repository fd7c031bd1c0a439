// app/src/db/doctors.rs

use crate::errors::Result;
use crate::models::{Doctor, DoctorFilter, NewDoctor, Schedule};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

const DOCTOR_COLUMNS: &str = "id, name, specialization, qualifications, experience, email, phone, available";

/// Available doctors matching `filter`: `search` is a substring match on name
/// or specialization, `specialty` an exact specialization.
#[instrument(name = "db::doctors::list_available", skip(pool), err(Display))]
pub async fn list_available(pool: &SqlitePool, filter: &DoctorFilter) -> Result<Vec<Doctor>> {
  let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
  query.push(DOCTOR_COLUMNS).push(" FROM doctors WHERE available = 1");

  if let Some(search) = &filter.search {
    let pattern = format!("%{}%", search);
    query
      .push(" AND (name LIKE ")
      .push_bind(pattern.clone())
      .push(" OR specialization LIKE ")
      .push_bind(pattern)
      .push(")");
  }
  if let Some(specialty) = &filter.specialty {
    query.push(" AND specialization = ").push_bind(specialty.clone());
  }
  query.push(" ORDER BY name");

  let doctors = query.build_query_as::<Doctor>().fetch_all(pool).await?;
  debug!(count = doctors.len(), "Doctors listed.");
  Ok(doctors)
}

/// Distinct specializations among available doctors, for the filter menu.
pub async fn specialties(pool: &SqlitePool) -> Result<Vec<String>> {
  let specialties = sqlx::query_scalar("SELECT DISTINCT specialization FROM doctors WHERE available = 1 ORDER BY specialization")
    .fetch_all(pool)
    .await?;
  Ok(specialties)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Doctor>> {
  let doctors = sqlx::query_as::<_, Doctor>(
    "SELECT id, name, specialization, qualifications, experience, email, phone, available FROM doctors ORDER BY name",
  )
  .fetch_all(pool)
  .await?;
  Ok(doctors)
}

pub async fn get(pool: &SqlitePool, doctor_id: i64) -> Result<Option<Doctor>> {
  let doctor = sqlx::query_as::<_, Doctor>(
    "SELECT id, name, specialization, qualifications, experience, email, phone, available FROM doctors WHERE id = ?",
  )
  .bind(doctor_id)
  .fetch_optional(pool)
  .await?;
  Ok(doctor)
}

pub async fn count_available(pool: &SqlitePool) -> Result<i64> {
  let count = sqlx::query_scalar("SELECT COUNT(*) FROM doctors WHERE available = 1")
    .fetch_one(pool)
    .await?;
  Ok(count)
}

pub async fn count<'e, E>(executor: E) -> Result<i64>
where
  E: sqlx::Executor<'e, Database = Sqlite>,
{
  let count = sqlx::query_scalar("SELECT COUNT(*) FROM doctors").fetch_one(executor).await?;
  Ok(count)
}

#[instrument(name = "db::doctors::insert", skip(executor, doctor), fields(name = %doctor.name), err(Display))]
pub async fn insert<'e, E>(executor: E, doctor: &NewDoctor) -> Result<i64>
where
  E: sqlx::Executor<'e, Database = Sqlite>,
{
  let id = sqlx::query_scalar(
    "INSERT INTO doctors (name, specialization, qualifications, experience, email, phone) \
     VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
  )
  .bind(doctor.name.clone())
  .bind(doctor.specialization.clone())
  .bind(doctor.qualifications.clone())
  .bind(doctor.experience)
  .bind(doctor.email.clone())
  .bind(doctor.phone.clone())
  .fetch_one(executor)
  .await?;
  Ok(id)
}

/// Flips `available` and returns the new value, or `None` for an unknown id.
#[instrument(name = "db::doctors::toggle_availability", skip(pool), err(Display))]
pub async fn toggle_availability(pool: &SqlitePool, doctor_id: i64) -> Result<Option<bool>> {
  let available = sqlx::query_scalar::<_, bool>(
    "UPDATE doctors SET available = CASE available WHEN 0 THEN 1 ELSE 0 END WHERE id = ? RETURNING available",
  )
  .bind(doctor_id)
  .fetch_optional(pool)
  .await?;
  Ok(available)
}

pub async fn insert_schedule<'e, E>(executor: E, doctor_id: i64, day_of_week: &str, start_time: &str, end_time: &str) -> Result<()>
where
  E: sqlx::Executor<'e, Database = Sqlite>,
{
  sqlx::query("INSERT INTO doctor_schedules (doctor_id, day_of_week, start_time, end_time) VALUES (?, ?, ?, ?)")
    .bind(doctor_id)
    .bind(day_of_week.to_string())
    .bind(start_time.to_string())
    .bind(end_time.to_string())
    .execute(executor)
    .await?;
  Ok(())
}

pub async fn schedules(pool: &SqlitePool, doctor_id: i64) -> Result<Vec<Schedule>> {
  let schedules = sqlx::query_as::<_, Schedule>(
    "SELECT id, doctor_id, day_of_week, start_time, end_time FROM doctor_schedules WHERE doctor_id = ? ORDER BY id",
  )
  .bind(doctor_id)
  .fetch_all(pool)
  .await?;
  Ok(schedules)
}
