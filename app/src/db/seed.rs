// app/src/db/seed.rs

//! Startup seeding: the admin account and a starter set of doctors.

use crate::config::AdminSeed;
use crate::db::{doctors, users};
use crate::errors::Result;
use crate::models::schedule::WORKDAYS;
use crate::models::{NewDoctor, NewUser};
use crate::services::auth_service;
use sqlx::SqlitePool;
use tracing::{info, instrument};

const SAMPLE_DOCTORS: [(&str, &str, &str, i64, &str, &str); 5] = [
  ("Dr. Sarah Johnson", "Cardiology", "MD, FACC", 15, "sarah.j@clinic.com", "555-0101"),
  ("Dr. Michael Chen", "Pediatrics", "MD, FAAP", 12, "michael.c@clinic.com", "555-0102"),
  ("Dr. Emily Williams", "Dermatology", "MD, FAAD", 10, "emily.w@clinic.com", "555-0103"),
  ("Dr. James Davis", "Orthopedics", "MD, FAAOS", 18, "james.d@clinic.com", "555-0104"),
  ("Dr. Lisa Anderson", "General Medicine", "MD", 8, "lisa.a@clinic.com", "555-0105"),
];

const SHIFT_START: &str = "09:00";
const SHIFT_END: &str = "17:00";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub admin_created: bool,
  pub doctors_created: usize,
}

/// Creates the admin when its email is absent and, when the doctors table is
/// empty, the sample doctors with Monday to Friday schedules. Runs in one
/// transaction and is safe to call on every start.
#[instrument(name = "db::seed", skip_all, fields(admin_email = %admin.email), err(Display))]
pub async fn seed_database(pool: &SqlitePool, admin: &AdminSeed) -> Result<SeedReport> {
  let mut report = SeedReport::default();
  let mut tx = pool.begin().await?;

  let admin_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
    .bind(&admin.email)
    .fetch_one(&mut *tx)
    .await?;
  if admin_count == 0 {
    let new_admin = NewUser {
      name: admin.name.clone(),
      email: admin.email.clone(),
      password_hash: auth_service::hash_password(&admin.password)?,
      phone: None,
      is_admin: true,
    };
    users::insert(&mut *tx, &new_admin).await?;
    report.admin_created = true;
  }

  if doctors::count(&mut *tx).await? == 0 {
    for (name, specialization, qualifications, experience, email, phone) in SAMPLE_DOCTORS {
      let doctor = NewDoctor {
        name: name.to_string(),
        specialization: specialization.to_string(),
        qualifications: Some(qualifications.to_string()),
        experience: Some(experience),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
      };
      let doctor_id = doctors::insert(&mut *tx, &doctor).await?;
      for day in WORKDAYS {
        doctors::insert_schedule(&mut *tx, doctor_id, day, SHIFT_START, SHIFT_END).await?;
      }
      report.doctors_created += 1;
    }
  }

  tx.commit().await?;
  info!(admin_created = report.admin_created, doctors_created = report.doctors_created, "Database seeded.");
  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::test_support::memory_pool;

  fn admin() -> AdminSeed {
    AdminSeed {
      name: "Admin User".to_string(),
      email: "admin@clinic.com".to_string(),
      password: "admin123".to_string(),
    }
  }

  #[tokio::test]
  async fn seeding_twice_creates_everything_once() {
    let pool = memory_pool().await;

    let first = seed_database(&pool, &admin()).await.unwrap();
    assert_eq!(first, SeedReport { admin_created: true, doctors_created: 5 });

    let second = seed_database(&pool, &admin()).await.unwrap();
    assert_eq!(second, SeedReport::default());

    assert_eq!(doctors::count(&pool).await.unwrap(), 5);
    let admin_user = users::find_by_email(&pool, "admin@clinic.com").await.unwrap().unwrap();
    assert!(admin_user.is_admin);
    assert!(auth_service::verify_password(&admin_user.password, "admin123").unwrap());
    assert_eq!(users::count_patients(&pool).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn sample_doctors_get_weekday_schedules() {
    let pool = memory_pool().await;
    seed_database(&pool, &admin()).await.unwrap();

    for doctor in doctors::list_all(&pool).await.unwrap() {
      let schedules = doctors::schedules(&pool, doctor.id).await.unwrap();
      let days: Vec<_> = schedules.iter().map(|s| s.day_of_week.as_str()).collect();
      assert_eq!(days, WORKDAYS);
      assert!(schedules.iter().all(|s| s.start_time == "09:00" && s.end_time == "17:00"));
    }
  }
}
