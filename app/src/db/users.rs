// app/src/db/users.rs

use crate::db::is_unique_violation;
use crate::errors::{AppError, Result};
use crate::models::{NewUser, User};
use sqlx::SqlitePool;
use tracing::{instrument, warn};

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>("SELECT id, name, email, password, phone, is_admin FROM users WHERE email = ?")
    .bind(email)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
    .bind(email)
    .fetch_one(pool)
    .await?;
  Ok(count > 0)
}

/// Inserts a user. A duplicate email, including one that raced past an
/// earlier existence check, is reported as `EmailTaken`.
#[instrument(name = "db::users::insert", skip(executor, new_user), fields(email = %new_user.email), err(Display))]
pub async fn insert<'e, E>(executor: E, new_user: &NewUser) -> Result<User>
where
  E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
  sqlx::query_as::<_, User>(
    "INSERT INTO users (name, email, password, phone, is_admin) VALUES (?, ?, ?, ?, ?) \
     RETURNING id, name, email, password, phone, is_admin",
  )
  .bind(new_user.name.clone())
  .bind(new_user.email.clone())
  .bind(new_user.password_hash.clone())
  .bind(new_user.phone.clone())
  .bind(new_user.is_admin)
  .fetch_one(executor)
  .await
  .map_err(|e| {
    if is_unique_violation(&e) {
      warn!("Email already registered.");
      AppError::EmailTaken
    } else {
      AppError::Sqlx(e)
    }
  })
}

pub async fn count_patients(pool: &SqlitePool) -> Result<i64> {
  let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = 0")
    .fetch_one(pool)
    .await?;
  Ok(count)
}
