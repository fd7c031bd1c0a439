// app/src/db/sessions.rs

//! Server-side login sessions keyed by an opaque random token.

use crate::errors::{AppError, Result};
use chrono::{Duration, Utc};
use clinic_core::Caller;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct SessionUser {
  id: i64,
  name: String,
  is_admin: bool,
}

/// Opens a session for `user_id` and returns its token.
#[instrument(name = "db::sessions::create", skip(pool), err(Display))]
pub async fn create(pool: &SqlitePool, user_id: i64, ttl_hours: i64) -> Result<String> {
  let token = Uuid::new_v4().simple().to_string();
  let expires_at = Duration::try_hours(ttl_hours)
    .and_then(|ttl| Utc::now().checked_add_signed(ttl))
    .ok_or_else(|| AppError::Internal(format!("Session TTL of {} hours is out of range", ttl_hours)))?
    .timestamp();

  sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
    .bind(&token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;
  debug!(expires_at, "Session opened.");
  Ok(token)
}

/// Resolves a token to its caller. Unknown and expired tokens are anonymous.
pub async fn resolve(pool: &SqlitePool, token: &str) -> Result<Caller> {
  let user = sqlx::query_as::<_, SessionUser>(
    "SELECT u.id, u.name, u.is_admin FROM sessions s JOIN users u ON u.id = s.user_id \
     WHERE s.token = ? AND s.expires_at > ?",
  )
  .bind(token)
  .bind(Utc::now().timestamp())
  .fetch_optional(pool)
  .await?;

  Ok(match user {
    Some(user) => Caller::from_user(user.id, user.name, user.is_admin),
    None => Caller::Anonymous,
  })
}

pub async fn delete(pool: &SqlitePool, token: &str) -> Result<()> {
  sqlx::query("DELETE FROM sessions WHERE token = ?")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}

/// Drops expired sessions. Returns how many were removed.
#[instrument(name = "db::sessions::purge_expired", skip(pool), err(Display))]
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64> {
  let removed = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await?
    .rows_affected();
  if removed > 0 {
    info!(removed, "Expired sessions purged.");
  }
  Ok(removed)
}
