// app/src/pipelines/contexts.rs

//! Context data of the authentication pipelines.

use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SignupCtxData {
  pub db_pool: SqlitePool,
  pub name: String,
  pub email: String,
  pub password: String,
  pub phone: Option<String>,
  pub created_user_id: Option<i64>,
}

impl SignupCtxData {
  pub fn new(db_pool: SqlitePool, name: &str, email: &str, password: &str, phone: Option<&str>) -> Self {
    Self {
      db_pool,
      name: name.to_string(),
      email: email.to_string(),
      password: password.to_string(),
      phone: phone.map(str::to_string),
      created_user_id: None,
    }
  }
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub db_pool: SqlitePool,
  pub session_ttl_hours: i64,
  pub email: String,
  pub password: String,
  pub temp_password_hash: Option<String>,
  pub user_id: Option<i64>,
  pub is_admin: bool,
  pub session_token: Option<String>,
}

impl SigninCtxData {
  pub fn new(db_pool: SqlitePool, session_ttl_hours: i64, email: &str, password: &str) -> Self {
    Self {
      db_pool,
      session_ttl_hours,
      email: email.to_string(),
      password: password.to_string(),
      temp_password_hash: None,
      user_id: None,
      is_admin: false,
      session_token: None,
    }
  }
}
